// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes one question against one dataset to the query engine.

use std::sync::Arc;

use raad_core::{
    DatasetName, EngineRequest, ErrorKind, QueryEngine, QueryOutcome, QueryResult, RaadError,
};
use raad_data::{DatasetStore, Datasets, materialize};
use raad_query::redact;
use tracing::{debug, info, warn};

use crate::classify::classify;

/// Prefix of the text answer produced when a query fails.
pub const ERROR_PREFIX: &str = "Error: ";

/// Dispatches questions to a [`QueryEngine`] over datasets from a [`DatasetStore`].
///
/// Each dispatch makes exactly one engine call. Nothing is retried or cached.
#[derive(Clone)]
pub struct QueryDispatcher {
    store: Arc<DatasetStore>,
    engine: Arc<dyn QueryEngine>,
}

impl QueryDispatcher {
    pub fn new(store: Arc<DatasetStore>, engine: Arc<dyn QueryEngine>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    pub fn engine(&self) -> &Arc<dyn QueryEngine> {
        &self.engine
    }

    /// Answers `question` against the dataset called `dataset`.
    ///
    /// Unknown dataset names and unavailable data fail before the engine is
    /// touched. Failures while materializing, querying or classifying are
    /// reported as a `Text("Error: ...")` outcome tagged with its [`ErrorKind`].
    pub async fn dispatch(&self, question: &str, dataset: &str) -> Result<QueryOutcome, RaadError> {
        let dataset = DatasetName::parse(dataset)?;
        let datasets = self.store.load()?;

        match self.run(question, dataset, &datasets).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let message = redact(&e.to_string(), &[]);
                let kind = ErrorKind::classify(&message);
                warn!(dataset = %dataset, error = %message, error_type = %kind, "query failed");
                Ok(
                    QueryOutcome::new(QueryResult::Text(format!("{ERROR_PREFIX}{message}")))
                        .with_error(kind),
                )
            }
        }
    }

    async fn run(
        &self,
        question: &str,
        dataset: DatasetName,
        datasets: &Datasets,
    ) -> Result<QueryOutcome, RaadError> {
        let handoff = materialize(datasets.get(dataset))?;
        debug!(dataset = %dataset, path = %handoff.path().display(), "dataset materialized");

        let request = EngineRequest {
            question: question.to_string(),
            dataset,
            data_path: handoff.path().to_path_buf(),
        };
        let raw = self.engine.ask(request).await?;
        let outcome = classify(raw);
        info!(
            dataset = %dataset,
            engine = self.engine.name(),
            response_type = %outcome.result.response_type(),
            "query answered"
        );
        Ok(outcome)
    }
}

impl std::fmt::Debug for QueryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDispatcher")
            .field("data_dir", &self.store.data_dir())
            .field("engine", &self.engine.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use raad_core::{HealthStatus, Table};
    use serde_json::{Value, json};
    use tracing_test::traced_test;

    struct FailingEngine(&'static str);

    #[async_trait]
    impl QueryEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "none"
        }

        async fn health_check(&self) -> Result<HealthStatus, RaadError> {
            Ok(HealthStatus::Healthy)
        }

        async fn ask(&self, _request: EngineRequest) -> Result<Value, RaadError> {
            Err(RaadError::query(self.0))
        }
    }

    fn store() -> Arc<DatasetStore> {
        let table = Table::new(vec!["company_name".into()], vec![vec![json!("SABIC")]]);
        Arc::new(DatasetStore::preloaded(Datasets::new(
            table.clone(),
            table.clone(),
            table.clone(),
            table,
        )))
    }

    #[tokio::test]
    #[traced_test]
    async fn engine_failures_become_error_text() {
        let dispatcher = QueryDispatcher::new(store(), Arc::new(FailingEngine("timeout")));
        let outcome = dispatcher.dispatch("q", "ratios").await.unwrap();
        assert_eq!(outcome.result, QueryResult::Text("Error: timeout".into()));
        assert_eq!(outcome.error, Some(ErrorKind::Timeout));
        assert!(logs_contain("query failed"));
        assert!(logs_contain("error_type=timeout"));
    }

    #[tokio::test]
    async fn failures_are_tagged_by_kind() {
        for (message, kind) in [
            ("401 Unauthorized", ErrorKind::Auth),
            ("rate limit reached", ErrorKind::RateLimit),
            ("KeyError: 'roe'", ErrorKind::Data),
            ("model overloaded", ErrorKind::Model),
            ("division by zero", ErrorKind::Generic),
        ] {
            let dispatcher = QueryDispatcher::new(store(), Arc::new(FailingEngine(message)));
            let outcome = dispatcher.dispatch("q", "analytics").await.unwrap();
            assert_eq!(outcome.result, QueryResult::Text(format!("Error: {message}")));
            assert_eq!(outcome.error, Some(kind), "{message}");
        }
    }

    #[tokio::test]
    async fn error_text_is_redacted() {
        let engine = FailingEngine("upstream rejected key sk-or-v1-0123456789abcdef0123");
        let dispatcher = QueryDispatcher::new(store(), Arc::new(engine));
        let outcome = dispatcher.dispatch("q", "facts").await.unwrap();
        let QueryResult::Text(text) = outcome.result else {
            panic!("expected text");
        };
        assert!(text.starts_with(ERROR_PREFIX));
        assert!(!text.contains("0123456789abcdef0123"));
    }

    #[tokio::test]
    async fn unknown_dataset_is_an_error() {
        let dispatcher = QueryDispatcher::new(store(), Arc::new(FailingEngine("unused")));
        let err = dispatcher.dispatch("q", "unknown").await.unwrap_err();
        assert!(matches!(err, RaadError::UnknownDataset(name) if name == "unknown"));
    }
}
