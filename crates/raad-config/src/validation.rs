// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: known log levels, a
//! usable engine setup, positive limits, a bindable gateway address.

use raad_core::DatasetName;

use crate::diagnostic::ConfigError;
use crate::model::{EngineKind, RaadConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RaadConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.app.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "app.log_level `{}` is not one of: {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.data.data_dir.as_os_str().is_empty() {
        errors.push(ConfigError::validation("data.data_dir must not be empty"));
    }
    if config.data.preview_rows == 0 {
        errors.push(ConfigError::validation("data.preview_rows must be at least 1"));
    }
    if config.data.preview_cols == 0 {
        errors.push(ConfigError::validation("data.preview_cols must be at least 1"));
    }

    validate_engine(config, &mut errors);

    // Questions shorter than three characters are always rejected.
    if config.session.max_question_len < 3 {
        errors.push(ConfigError::validation(
            "session.max_question_len must be at least 3",
        ));
    }
    if config.session.max_sessions == 0 {
        errors.push(ConfigError::validation("session.max_sessions must be at least 1"));
    }
    if DatasetName::parse(&config.session.default_dataset).is_err() {
        errors.push(ConfigError::validation(format!(
            "session.default_dataset `{}` is not one of: filings, facts, ratios, analytics",
            config.session.default_dataset
        )));
    }

    let host = config.gateway.host.trim();
    let host_ok = host.parse::<std::net::IpAddr>().is_ok()
        || (!host.is_empty()
            && host
                .chars()
                .all(|c| c.is_alphanumeric() || c == '.' || c == '-'));
    if !host_ok {
        errors.push(ConfigError::validation(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        )));
    }
    if config.gateway.port == 0 {
        errors.push(ConfigError::validation("gateway.port must not be 0"));
    }
    if let Some(token) = &config.gateway.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "gateway.bearer_token must not be empty when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_engine(config: &RaadConfig, errors: &mut Vec<ConfigError>) {
    let engine = &config.engine;

    if engine.model.trim().is_empty() {
        errors.push(ConfigError::validation("engine.model must not be empty"));
    }
    if engine.timeout_secs == 0 {
        errors.push(ConfigError::validation("engine.timeout_secs must be at least 1"));
    }
    if engine.api_key_env.trim().is_empty() {
        errors.push(ConfigError::validation("engine.api_key_env must not be empty"));
    }

    match engine.kind {
        EngineKind::Http => {
            let endpoint = engine.endpoint.trim();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(ConfigError::validation(format!(
                    "engine.endpoint `{endpoint}` must be an http:// or https:// URL"
                )));
            }
        }
        EngineKind::Command => {
            if engine.command.as_deref().is_none_or(|c| c.trim().is_empty()) {
                errors.push(ConfigError::validation(
                    "engine.command is required when engine.kind = \"command\"",
                ));
            }
        }
    }
}
