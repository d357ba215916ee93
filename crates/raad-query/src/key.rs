// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API key resolution, validation and the engine status summary.

use raad_config::EngineConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Keys shorter than this are rejected as obviously truncated.
pub const MIN_KEY_LEN: usize = 10;

/// Config value first, then the environment variable named by `engine.api_key_env`.
///
/// `env` is the lookup to use for environment variables, normally
/// `|name| std::env::var(name).ok()`.
pub fn resolve_api_key(
    config: &EngineConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    config
        .api_key
        .clone()
        .or_else(|| env(&config.api_key_env))
        .map(SecretString::from)
}

/// Checks a key for presence and plausible length. The error is user-facing.
pub fn validate_api_key(key: Option<&SecretString>, env_name: &str) -> Result<(), String> {
    let Some(key) = key else {
        return Err(format!(
            "API key is missing. Set engine.api_key or the {env_name} environment variable."
        ));
    };
    let trimmed = key.expose_secret().trim();
    if trimmed.is_empty() {
        return Err("API key is empty. Please provide a valid API key.".to_string());
    }
    if trimmed.chars().count() < MIN_KEY_LEN {
        return Err("API key appears too short. Please check your key.".to_string());
    }
    Ok(())
}

/// What status panels show about the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub configured: bool,
    pub model: String,
    pub model_display: String,
    pub has_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EngineStatus {
    pub fn from_config(config: &EngineConfig, key: Option<&SecretString>) -> Self {
        let validation = validate_api_key(key, &config.api_key_env);
        Self {
            configured: validation.is_ok(),
            model: config.model.clone(),
            model_display: config.model_display_name.clone(),
            has_key: key.is_some(),
            error: validation.err(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn config_value_wins_over_env() {
        let config = EngineConfig {
            api_key: Some("sk-or-from-config".into()),
            ..EngineConfig::default()
        };
        let key = resolve_api_key(&config, |_| Some("from-env-value".into())).unwrap();
        assert_eq!(key.expose_secret(), "sk-or-from-config");
    }

    #[test]
    fn env_fallback_uses_configured_name() {
        let config = EngineConfig {
            api_key_env: "CUSTOM_KEY".into(),
            ..EngineConfig::default()
        };
        let key = resolve_api_key(&config, |name| {
            (name == "CUSTOM_KEY").then(|| "sk-or-env-123456".to_string())
        });
        assert_eq!(key.unwrap().expose_secret(), "sk-or-env-123456");
        assert!(resolve_api_key(&config, no_env).is_none());
    }

    #[test]
    fn validation_reasons() {
        let missing = validate_api_key(None, "OPENROUTER_API_KEY").unwrap_err();
        assert!(missing.contains("missing"));
        assert!(missing.contains("OPENROUTER_API_KEY"));

        let empty = SecretString::from("   ".to_string());
        assert!(validate_api_key(Some(&empty), "K").unwrap_err().contains("empty"));

        let short = SecretString::from("sk-123".to_string());
        assert!(validate_api_key(Some(&short), "K").unwrap_err().contains("too short"));

        let ok = SecretString::from("sk-or-v1-abcdef".to_string());
        assert!(validate_api_key(Some(&ok), "K").is_ok());
    }

    #[test]
    fn status_reports_model_and_error() {
        let config = EngineConfig::default();
        let status = EngineStatus::from_config(&config, None);
        assert!(!status.configured);
        assert!(!status.has_key);
        assert_eq!(status.model_display, "Gemini 2.0 Flash");
        assert!(status.error.is_some());

        let key = SecretString::from("sk-or-v1-abcdef".to_string());
        let status = EngineStatus::from_config(&config, Some(&key));
        assert!(status.configured);
        assert!(status.error.is_none());
    }
}
