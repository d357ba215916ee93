// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query engine that runs a local query program once per question.
//!
//! The program gets the configured args followed by
//! `--data <path> --question <q> --model <m>`, the API key in the configured
//! environment variable, and is expected to print its answer on stdout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use raad_config::EngineConfig;
use raad_core::{EngineRequest, HealthStatus, QueryEngine, RaadError};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::key::validate_api_key;
use crate::redact::redact;

#[derive(Debug, Clone)]
pub struct CommandQueryEngine {
    program: String,
    args: Vec<String>,
    model: String,
    api_key: Option<SecretString>,
    api_key_env: String,
    timeout: Duration,
}

impl CommandQueryEngine {
    pub fn new(config: &EngineConfig, api_key: Option<SecretString>) -> Result<Self, RaadError> {
        let program = config
            .command
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| RaadError::Config("engine.command is not set".into()))?;

        Ok(Self {
            program,
            args: config.args.clone(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn scrub(&self, message: &str) -> String {
        let key = self.api_key.as_ref().map(|k| k.expose_secret());
        redact(message, key.as_slice())
    }
}

/// Parses program output as JSON, falling back to the trimmed text as a JSON string.
pub fn parse_output(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    serde_json::from_str(trimmed).unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string()))
}

#[async_trait]
impl QueryEngine for CommandQueryEngine {
    fn name(&self) -> &str {
        "command"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<HealthStatus, RaadError> {
        if let Err(reason) = validate_api_key(self.api_key.as_ref(), &self.api_key_env) {
            return Ok(HealthStatus::Unhealthy(reason));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn ask(&self, request: EngineRequest) -> Result<serde_json::Value, RaadError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg("--data")
            .arg(&request.data_path)
            .arg("--question")
            .arg(&request.question)
            .arg("--model")
            .arg(&self.model)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(key) = &self.api_key {
            command.env(&self.api_key_env, key.expose_secret());
        }

        debug!(program = %self.program, dataset = %request.dataset, "running query program");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                RaadError::query(format!(
                    "query timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| RaadError::QueryExecution {
                message: format!("failed to run query program `{}`: {e}", self.program),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code().unwrap_or(-1);
            let detail = stderr.trim();
            let message = if detail.is_empty() {
                format!("query program exited with code {code}")
            } else {
                format!("query program exited with code {code}: {detail}")
            };
            return Err(RaadError::query(self.scrub(&message)));
        }

        Ok(parse_output(&String::from_utf8_lossy(&output.stdout)))
    }
}
