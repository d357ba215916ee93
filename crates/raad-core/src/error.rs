// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Raad.

use thiserror::Error;

/// The primary error type used across the dataset store, query engines and chat pipeline.
#[derive(Debug, Error)]
pub enum RaadError {
    /// Configuration errors (invalid values, missing engine settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required dataset file is missing or unreadable. Fatal to the interface.
    #[error("dataset `{dataset}` is unavailable: {reason}")]
    DataUnavailable { dataset: String, reason: String },

    /// The dataset name is not one of `filings`, `facts`, `ratios`, `analytics`.
    #[error("unknown dataset `{0}` (expected one of: filings, facts, ratios, analytics)")]
    UnknownDataset(String),

    /// A chat role string is not `user`, `assistant` or `system`.
    #[error("invalid role `{0}` (expected one of: user, assistant, system)")]
    InvalidRole(String),

    /// Writing the temporary dataset handoff failed.
    #[error("failed to materialize dataset: {source}")]
    Materialize {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The external query engine failed for a question.
    #[error("{message}")]
    QueryExecution {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The question was rejected before dispatch (blank or too long).
    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    /// No chat session exists with the given id.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The session is already processing a question.
    #[error("session {0} is already processing a question")]
    SessionBusy(String),

    /// The registry already holds the maximum number of sessions.
    #[error("session limit reached ({0} sessions)")]
    SessionLimit(usize),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RaadError {
    /// Convenience constructor for engine failures without an underlying source.
    pub fn query(message: impl Into<String>) -> Self {
        RaadError::QueryExecution {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error must halt the interface rather than be reported per query.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RaadError::DataUnavailable { .. } | RaadError::Config(_))
    }
}
