// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query engine trait for the external natural-language-to-dataframe capability.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RaadError;
use crate::types::{DatasetName, HealthStatus};

/// One question bound to one materialized dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineRequest {
    /// The user's natural-language question, verbatim.
    pub question: String,
    /// Which dataset the question targets.
    pub dataset: DatasetName,
    /// Location of the temporary columnar copy of the dataset.
    pub data_path: PathBuf,
}

/// A backend that turns a question plus a dataset into a raw answer.
///
/// The answer is returned untyped; the dispatcher classifies it into a
/// text, table or chart result. Implementations must not retry: each call
/// to [`QueryEngine::ask`] maps to exactly one model interaction.
#[async_trait]
pub trait QueryEngine: Send + Sync + 'static {
    /// Returns the human-readable name of this engine.
    fn name(&self) -> &str;

    /// The model identifier this engine sends requests to.
    fn model(&self) -> &str;

    /// Performs a health check and returns the engine's current status.
    async fn health_check(&self) -> Result<HealthStatus, RaadError>;

    /// Answers one question against one dataset.
    async fn ask(&self, request: EngineRequest) -> Result<serde_json::Value, RaadError>;
}
