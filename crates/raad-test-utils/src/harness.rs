// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end chat pipeline tests.
//!
//! `TestHarness` writes the fixture datasets to a temp directory and wires a
//! real [`DatasetStore`] and [`QueryDispatcher`] to a [`MockQueryEngine`].

use std::path::Path;
use std::sync::Arc;

use raad_agent::{ChatSession, QueryDispatcher, Reply, SessionRegistry, SessionSettings};
use raad_core::{DatasetName, RaadError, SessionId};
use raad_data::DatasetStore;
use serde_json::Value;
use tempfile::TempDir;

use crate::fixtures::write_datasets;
use crate::mock_engine::MockQueryEngine;

/// Builder for test environments.
pub struct TestHarnessBuilder {
    answers: Vec<Result<Value, String>>,
    settings: SessionSettings,
    missing: Option<DatasetName>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            answers: Vec::new(),
            settings: SessionSettings::default(),
            missing: None,
        }
    }

    /// Queue raw engine answers.
    pub fn with_answers(mut self, answers: Vec<Value>) -> Self {
        self.answers.extend(answers.into_iter().map(Ok));
        self
    }

    /// Queue an engine failure.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.answers.push(Err(message.into()));
        self
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Leave one dataset file out of the data directory.
    pub fn without_dataset(mut self, name: DatasetName) -> Self {
        self.missing = Some(name);
        self
    }

    pub fn build(self) -> Result<TestHarness, RaadError> {
        let data_dir = TempDir::new().map_err(|e| RaadError::Internal(e.to_string()))?;
        write_datasets(data_dir.path(), self.missing)
            .map_err(|e| RaadError::Internal(e.to_string()))?;

        let engine = Arc::new(MockQueryEngine::with_answers(self.answers));
        let store = Arc::new(DatasetStore::new(data_dir.path()));
        let dispatcher = QueryDispatcher::new(Arc::clone(&store), engine.clone());
        let session = ChatSession::new(
            SessionId("test-session".into()),
            dispatcher.clone(),
            self.settings.clone(),
        );

        Ok(TestHarness {
            engine,
            store,
            dispatcher,
            session,
            settings: self.settings,
            data_dir,
        })
    }
}

/// A complete chat pipeline over fixture data and a scripted engine.
pub struct TestHarness {
    pub engine: Arc<MockQueryEngine>,
    pub store: Arc<DatasetStore>,
    pub dispatcher: QueryDispatcher,
    pub session: ChatSession,
    settings: SessionSettings,
    data_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Runs one turn through the session.
    pub async fn ask(&mut self, question: &str) -> Result<Reply, RaadError> {
        self.session.ask(question).await
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// A registry sharing this harness's dispatcher.
    pub fn registry(&self, max_sessions: usize) -> SessionRegistry {
        SessionRegistry::new(self.dispatcher.clone(), self.settings.clone(), max_sessions)
    }
}
