// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted query engine for deterministic tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use raad_core::{DatasetName, EngineRequest, HealthStatus, QueryEngine, RaadError};
use serde_json::Value;
use tokio::sync::Mutex;

/// One call observed by [`MockQueryEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub question: String,
    pub dataset: DatasetName,
    pub data_path: PathBuf,
    /// Whether the handoff file existed while the engine was running.
    pub data_existed: bool,
    /// First line of the handoff file (the CSV header).
    pub header: Option<String>,
}

/// A query engine that pops answers from a FIFO queue.
///
/// `Ok` entries are returned as the raw answer, `Err` entries become a
/// `QueryExecution` error with that message. An empty queue answers
/// `"mock answer"`.
pub struct MockQueryEngine {
    answers: Arc<Mutex<VecDeque<Result<Value, String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockQueryEngine {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_answers(answers: Vec<Result<Value, String>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::from(answers))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_answer(&self, answer: Value) {
        self.answers.lock().await.push_back(Ok(answer));
    }

    pub async fn push_error(&self, message: impl Into<String>) {
        self.answers.lock().await.push_back(Err(message.into()));
    }

    /// Calls made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryEngine for MockQueryEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn health_check(&self) -> Result<HealthStatus, RaadError> {
        Ok(HealthStatus::Healthy)
    }

    async fn ask(&self, request: EngineRequest) -> Result<Value, RaadError> {
        let contents = std::fs::read_to_string(&request.data_path).ok();
        self.calls.lock().await.push(RecordedCall {
            question: request.question,
            dataset: request.dataset,
            data_existed: contents.is_some(),
            header: contents.and_then(|c| c.lines().next().map(str::to_string)),
            data_path: request.data_path,
        });

        match self.answers.lock().await.pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(RaadError::query(message)),
            None => Ok(Value::String("mock answer".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(path: PathBuf) -> EngineRequest {
        EngineRequest {
            question: "q".into(),
            dataset: DatasetName::Facts,
            data_path: path,
        }
    }

    #[tokio::test]
    async fn answers_in_order_then_default() {
        let engine = MockQueryEngine::with_answers(vec![Ok(json!(1)), Err("boom".into())]);
        assert_eq!(engine.ask(request("/nope".into())).await.unwrap(), json!(1));
        let err = engine.ask(request("/nope".into())).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(engine.ask(request("/nope".into())).await.unwrap(), json!("mock answer"));
        assert_eq!(engine.call_count().await, 3);
    }

    #[tokio::test]
    async fn records_whether_data_existed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "a,b\n1,2\n").unwrap();
        let engine = MockQueryEngine::new();
        engine.ask(request(file.path().to_path_buf())).await.unwrap();
        let calls = engine.calls().await;
        assert!(calls[0].data_existed);
        assert_eq!(calls[0].header.as_deref(), Some("a,b"));
    }
}
