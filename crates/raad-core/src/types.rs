// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the dataset store, query engines and chat pipeline.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::RaadError;
use crate::table::Table;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by engine and data health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational but experiencing issues.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// The author of a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Parses a role string, failing for anything but `user`, `assistant`, `system`.
    pub fn parse(s: &str) -> Result<Self, RaadError> {
        Role::from_str(s).map_err(|_| RaadError::InvalidRole(s.to_string()))
    }
}

/// One of the four pre-computed financial datasets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DatasetName {
    Filings,
    Facts,
    Ratios,
    Analytics,
}

impl DatasetName {
    /// All datasets, in load order.
    pub const ALL: [DatasetName; 4] = [
        DatasetName::Filings,
        DatasetName::Facts,
        DatasetName::Ratios,
        DatasetName::Analytics,
    ];

    /// Parses a dataset name, failing with [`RaadError::UnknownDataset`].
    pub fn parse(s: &str) -> Result<Self, RaadError> {
        DatasetName::from_str(s.trim()).map_err(|_| RaadError::UnknownDataset(s.to_string()))
    }

    /// File name of the dataset inside the data directory.
    pub fn file_name(&self) -> String {
        format!("{self}.csv")
    }
}

/// How an assistant answer is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResponseType {
    Text,
    Dataframe,
    Chart,
}

/// Metadata key holding the [`ResponseType`] of an assistant turn.
pub const RESPONSE_TYPE_KEY: &str = "response_type";

/// Metadata key holding the [`ErrorKind`] of a failed assistant turn.
pub const ERROR_TYPE_KEY: &str = "error_type";

/// Broad category of a failed query, derived from the engine's message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Timeout,
    Data,
    Model,
    Generic,
}

impl ErrorKind {
    /// Lowercased substrings that select each kind. Checked in order; first hit wins.
    const PATTERNS: [(ErrorKind, &'static [&'static str]); 5] = [
        (
            ErrorKind::Auth,
            &["authentication", "api key", "unauthorized", "401", "invalid key"],
        ),
        (
            ErrorKind::RateLimit,
            &["rate limit", "too many requests", "429", "quota"],
        ),
        (ErrorKind::Timeout, &["timeout", "timed out", "connection", "network"]),
        (
            ErrorKind::Data,
            &["column", "not found", "keyerror", "indexerror", "no data"],
        ),
        (ErrorKind::Model, &["model", "gemini", "llm", "generation"]),
    ];

    /// Categorizes an error message; unmatched messages are [`ErrorKind::Generic`].
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        Self::PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
            .map_or(ErrorKind::Generic, |(kind, _)| *kind)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "API Key Issue",
            ErrorKind::RateLimit => "Rate Limit Exceeded",
            ErrorKind::Timeout => "Connection Timeout",
            ErrorKind::Data => "Data Error",
            ErrorKind::Model => "Model Error",
            ErrorKind::Generic => "An Error Occurred",
        }
    }

    /// Suggested steps for the user, most useful first.
    pub fn resolution_steps(&self) -> &'static [&'static str] {
        match self {
            ErrorKind::Auth => &[
                "Check that the engine API key is set in the config or environment",
                "Verify the key is valid and not expired",
                "Ensure the key has the required permissions",
            ],
            ErrorKind::RateLimit => &[
                "Wait a few minutes before trying again",
                "Reduce the frequency of your requests",
                "Consider a plan with higher limits",
            ],
            ErrorKind::Timeout => &[
                "Check the network connection to the engine",
                "Try again in a few moments",
                "The engine might be under high load",
            ],
            ErrorKind::Data => &[
                "Check the column names with the column reference",
                "Try a different dataset",
                "Rephrase the question around columns that exist",
            ],
            ErrorKind::Model => &[
                "Rephrase the question",
                "The model might be temporarily unavailable",
                "Check the configured model name",
            ],
            ErrorKind::Generic => &[
                "Check your question and try again",
                "If the problem persists, run `raad doctor`",
            ],
        }
    }
}

/// One turn in a conversation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact: Option<PathBuf>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            code: None,
            metadata: Map::new(),
            artifact: None,
        }
    }

    /// Builds a message from an untyped role string.
    pub fn try_new(role: &str, content: impl Into<String>) -> Result<Self, RaadError> {
        Ok(Self::new(Role::parse(role)?, content))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact = Some(path.into());
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// True when generated code is attached and not blank.
    pub fn has_code(&self) -> bool {
        self.code.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Wall-clock time of the turn as `HH:MM:SS`.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    /// The response type recorded in metadata, if any.
    pub fn response_type(&self) -> Option<ResponseType> {
        self.metadata
            .get(RESPONSE_TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| ResponseType::from_str(s).ok())
    }

    /// The error category recorded for a failed query, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.metadata
            .get(ERROR_TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| ErrorKind::from_str(s).ok())
    }
}

/// The normalized outcome of dispatching one question against one dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Text(String),
    Table(Table),
    ChartReference(PathBuf),
}

impl QueryResult {
    pub fn response_type(&self) -> ResponseType {
        match self {
            QueryResult::Text(_) => ResponseType::Text,
            QueryResult::Table(_) => ResponseType::Dataframe,
            QueryResult::ChartReference(_) => ResponseType::Chart,
        }
    }
}

/// A [`QueryResult`] plus the code the engine reported generating for it.
///
/// `error` is set when the result is the text of a recovered failure.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub result: QueryResult,
    pub code: Option<String>,
    pub error: Option<ErrorKind>,
}

impl QueryOutcome {
    pub fn new(result: QueryResult) -> Self {
        Self {
            result,
            code: None,
            error: None,
        }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub fn with_error(mut self, kind: ErrorKind) -> Self {
        self.error = Some(kind);
        self
    }
}
