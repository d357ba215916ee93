// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query engine backed by an HTTP query service.
//!
//! One POST per question, no retries. The service receives the question,
//! the dataset name and the path of the materialized file, and answers
//! with any JSON value.

use std::time::Duration;

use async_trait::async_trait;
use raad_config::EngineConfig;
use raad_core::{EngineRequest, HealthStatus, QueryEngine, RaadError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::key::validate_api_key;
use crate::redact::redact;

/// JSON body sent to the query service.
#[derive(Debug, Serialize)]
struct QueryRequestBody<'a> {
    question: &'a str,
    dataset: &'a str,
    data_path: String,
    model: &'a str,
}

/// Error payloads the service may send with a non-2xx status.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceError {
    Nested { error: ServiceErrorDetail },
    Flat { error: String },
    Message { message: String },
    Detail { detail: String },
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    message: String,
}

impl ServiceError {
    fn into_message(self) -> String {
        match self {
            ServiceError::Nested { error } => error.message,
            ServiceError::Flat { error } => error,
            ServiceError::Message { message } => message,
            ServiceError::Detail { detail } => detail,
        }
    }
}

/// Talks to a query service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQueryEngine {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    api_key_env: String,
    timeout: Duration,
}

impl HttpQueryEngine {
    pub fn new(config: &EngineConfig, api_key: Option<SecretString>) -> Result<Self, RaadError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RaadError::QueryExecution {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn scrub(&self, message: &str) -> String {
        let key = self.api_key.as_ref().map(|k| k.expose_secret());
        redact(message, key.as_slice())
    }
}

#[async_trait]
impl QueryEngine for HttpQueryEngine {
    fn name(&self) -> &str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<HealthStatus, RaadError> {
        Ok(match validate_api_key(self.api_key.as_ref(), &self.api_key_env) {
            Ok(()) => HealthStatus::Healthy,
            Err(reason) => HealthStatus::Unhealthy(reason),
        })
    }

    async fn ask(&self, request: EngineRequest) -> Result<serde_json::Value, RaadError> {
        let body = QueryRequestBody {
            question: &request.question,
            dataset: <&'static str>::from(request.dataset),
            data_path: request.data_path.display().to_string(),
            model: &self.model,
        };

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("query timed out after {}s", self.timeout.as_secs())
            } else {
                self.scrub(&format!("query service request failed: {e}"))
            };
            RaadError::QueryExecution {
                message,
                source: Some(Box::new(e)),
            }
        })?;

        let status = response.status();
        debug!(status = %status, dataset = %request.dataset, "query response received");

        let text = response.text().await.map_err(|e| RaadError::QueryExecution {
            message: format!("failed to read query response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ServiceError>(&text)
                .map(ServiceError::into_message)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(RaadError::query(self.scrub(&format!(
                "query service returned {status}: {detail}"
            ))));
        }

        serde_json::from_str(&text).map_err(|e| RaadError::QueryExecution {
            message: format!("failed to parse query response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raad_core::DatasetName;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "sk-or-v1-test-key-0123456789";

    fn engine(server: &MockServer) -> HttpQueryEngine {
        let config = EngineConfig {
            endpoint: format!("{}/v1/query", server.uri()),
            timeout_secs: 2,
            ..EngineConfig::default()
        };
        HttpQueryEngine::new(&config, Some(SecretString::from(KEY.to_string()))).unwrap()
    }

    fn request() -> EngineRequest {
        EngineRequest {
            question: "What are the top 10 companies by revenue in 2024?".into(),
            dataset: DatasetName::Analytics,
            data_path: "/tmp/raad-dataset-x.csv".into(),
        }
    }

    #[tokio::test]
    async fn ask_posts_question_and_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/query"))
            .and(header("authorization", format!("Bearer {KEY}").as_str()))
            .and(body_partial_json(json!({
                "dataset": "analytics",
                "data_path": "/tmp/raad-dataset-x.csv",
                "model": "openrouter/google/gemini-2.0-flash-001",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"type": "number", "value": 42})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let value = engine(&server).ask(request()).await.unwrap();
        assert_eq!(value["value"], json!(42));
    }

    #[tokio::test]
    async fn error_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({"error": {"message": "model overloaded"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = engine(&server).ask(request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("503"), "got: {msg}");
        assert!(msg.contains("model overloaded"), "got: {msg}");
    }

    #[tokio::test]
    async fn error_body_secrets_are_redacted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(format!("invalid key {KEY}")),
            )
            .mount(&server)
            .await;

        let msg = engine(&server).ask(request()).await.unwrap_err().to_string();
        assert!(!msg.contains(KEY), "got: {msg}");
        assert!(msg.contains("[REDACTED]"), "got: {msg}");
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!("late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let msg = engine(&server).ask(request()).await.unwrap_err().to_string();
        assert_eq!(msg, "query timed out after 2s");
    }

    #[tokio::test]
    async fn invalid_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = engine(&server).ask(request()).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn health_reflects_key() {
        let server = MockServer::start().await;
        assert!(engine(&server).health_check().await.unwrap().is_healthy());

        let keyless = HttpQueryEngine::new(&EngineConfig::default(), None).unwrap();
        assert!(matches!(
            keyless.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
