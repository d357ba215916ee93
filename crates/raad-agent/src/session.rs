// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single chat conversation: history, selected dataset, recent and
//! favorite questions.

use chrono::{DateTime, Utc};
use raad_config::SessionConfig;
use raad_core::{ChatMessage, DatasetName, ErrorKind, RaadError, SessionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::dispatcher::QueryDispatcher;
use crate::history::SessionHistory;
use crate::renderer::{DisplayAction, render_and_record};
use crate::sanitize::sanitize_question;

/// Per-session limits, resolved from `[session]` config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub max_question_len: usize,
    pub max_recent_queries: usize,
    pub max_favorites: usize,
    pub default_dataset: DatasetName,
}

impl SessionSettings {
    pub fn from_config(config: &SessionConfig) -> Result<Self, RaadError> {
        Ok(Self {
            max_question_len: config.max_question_len,
            max_recent_queries: config.max_recent_queries,
            max_favorites: config.max_favorites,
            default_dataset: DatasetName::parse(&config.default_dataset)?,
        })
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_question_len: 2000,
            max_recent_queries: 10,
            max_favorites: 20,
            default_dataset: DatasetName::Analytics,
        }
    }
}

/// The answer to one accepted question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub display: DisplayAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Set when the answer is the text of a failed query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

/// A question asked in this session, with the dataset it ran against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentQuery {
    pub query: String,
    pub dataset: DatasetName,
    pub at: DateTime<Utc>,
}

/// One conversation. Owns its history; nothing else mutates it.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    history: SessionHistory,
    dataset: DatasetName,
    recent_queries: Vec<RecentQuery>,
    favorites: Vec<String>,
    dispatcher: QueryDispatcher,
    settings: SessionSettings,
}

impl ChatSession {
    pub fn new(id: SessionId, dispatcher: QueryDispatcher, settings: SessionSettings) -> Self {
        let dataset = settings.default_dataset;
        Self {
            id,
            history: SessionHistory::new(),
            dataset,
            recent_queries: Vec::new(),
            favorites: Vec::new(),
            dispatcher,
            settings,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn dataset(&self) -> DatasetName {
        self.dataset
    }

    /// Recent questions, newest first.
    pub fn recent_queries(&self) -> &[RecentQuery] {
        &self.recent_queries
    }

    /// Favorite questions, oldest first.
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Saves a question as a favorite. Returns false if it was already saved.
    ///
    /// The question is normalized like an asked question. Past the configured
    /// cap the oldest favorite is dropped.
    pub fn add_favorite(&mut self, question: &str) -> Result<bool, RaadError> {
        let question = sanitize_question(question, self.settings.max_question_len)?;
        if self.favorites.contains(&question) {
            return Ok(false);
        }
        self.favorites.push(question);
        let excess = self.favorites.len().saturating_sub(self.settings.max_favorites);
        self.favorites.drain(..excess);
        debug!(session_id = %self.id, favorites = self.favorites.len(), "favorite added");
        Ok(true)
    }

    /// Removes a favorite. Returns false if it was not saved.
    pub fn remove_favorite(&mut self, question: &str) -> bool {
        let normalized = sanitize_question(question, self.settings.max_question_len)
            .unwrap_or_else(|_| question.to_string());
        let before = self.favorites.len();
        self.favorites.retain(|f| *f != normalized);
        before != self.favorites.len()
    }

    pub fn select_dataset(&mut self, name: &str) -> Result<DatasetName, RaadError> {
        let dataset = DatasetName::parse(name)?;
        if dataset != self.dataset {
            debug!(session_id = %self.id, from = %self.dataset, to = %dataset, "dataset selected");
        }
        self.dataset = dataset;
        Ok(dataset)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!(session_id = %self.id, "history cleared");
    }

    /// Runs one turn: records the question, dispatches it and records the answer.
    ///
    /// The question is normalized first (control characters stripped,
    /// whitespace collapsed); blank, too short or overlong questions are
    /// rejected with nothing recorded. Query failures come back as an
    /// `Error: ...` text reply tagged with their kind; only data that cannot
    /// be loaded is returned as an error, after the question was recorded.
    #[instrument(skip_all, fields(session_id = %self.id, dataset = %self.dataset))]
    pub async fn ask(&mut self, question: &str) -> Result<Reply, RaadError> {
        let question = sanitize_question(question, self.settings.max_question_len)?;

        self.history.append(ChatMessage::user(question.as_str()));
        self.remember(&question);

        let dataset: &'static str = self.dataset.into();
        let outcome = self.dispatcher.dispatch(&question, dataset).await?;
        let code = outcome.code.clone();
        let error_type = outcome.error;
        let display = render_and_record(outcome, &mut self.history);
        Ok(Reply {
            display,
            code,
            error_type,
        })
    }

    fn remember(&mut self, question: &str) {
        self.recent_queries.retain(|q| q.query != question);
        self.recent_queries.insert(
            0,
            RecentQuery {
                query: question.to_string(),
                dataset: self.dataset,
                at: Utc::now(),
            },
        );
        self.recent_queries.truncate(self.settings.max_recent_queries);
    }
}
