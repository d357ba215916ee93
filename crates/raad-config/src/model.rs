// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Raad.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Raad configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RaadConfig {
    /// Application-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Dataset location and preview settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Query engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Chat session limits.
    #[serde(default)]
    pub session: SessionConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Application-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Dataset store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Directory holding `filings.csv`, `facts.csv`, `ratios.csv` and `analytics.csv`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Rows shown by dataset previews.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Columns shown by dataset previews.
    #[serde(default = "default_preview_cols")]
    pub preview_cols: usize,

    /// Directory for CSV and conversation exports.
    #[serde(default = "default_exports_dir")]
    pub exports_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            preview_rows: default_preview_rows(),
            preview_cols: default_preview_cols(),
            exports_dir: default_exports_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_preview_rows() -> usize {
    5
}

fn default_preview_cols() -> usize {
    6
}

fn default_exports_dir() -> PathBuf {
    PathBuf::from("exports")
}

/// Which query engine adapter to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// POST questions to a query service over HTTP.
    #[default]
    Http,
    /// Run a local query program per question.
    Command,
}

/// Query engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Engine adapter to use.
    #[serde(default)]
    pub kind: EngineKind,

    /// Query service URL for the HTTP engine.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Program to run for the command engine.
    #[serde(default)]
    pub command: Option<String>,

    /// Extra arguments passed to the command engine before the per-question ones.
    #[serde(default)]
    pub args: Vec<String>,

    /// Model identifier forwarded to the engine.
    #[serde(default = "default_model")]
    pub model: String,

    /// Human-readable model name for status displays.
    #[serde(default = "default_model_display_name")]
    pub model_display_name: String,

    /// API key. `None` falls back to the environment variable named by `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-question timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            endpoint: default_endpoint(),
            command: None,
            args: Vec::new(),
            model: default_model(),
            model_display_name: default_model_display_name(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/v1/query".to_string()
}

fn default_model() -> String {
    "openrouter/google/gemini-2.0-flash-001".to_string()
}

fn default_model_display_name() -> String {
    "Gemini 2.0 Flash".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Chat session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Longest accepted question, in characters.
    #[serde(default = "default_max_question_len")]
    pub max_question_len: usize,

    /// Number of recent questions remembered per session.
    #[serde(default = "default_max_recent_queries")]
    pub max_recent_queries: usize,

    /// Number of favorite questions kept per session; the oldest drop first.
    #[serde(default = "default_max_favorites")]
    pub max_favorites: usize,

    /// Maximum number of live sessions in the gateway registry.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Dataset selected for new sessions.
    #[serde(default = "default_dataset")]
    pub default_dataset: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_question_len: default_max_question_len(),
            max_recent_queries: default_max_recent_queries(),
            max_favorites: default_max_favorites(),
            max_sessions: default_max_sessions(),
            default_dataset: default_dataset(),
        }
    }
}

fn default_max_question_len() -> usize {
    2000
}

fn default_max_recent_queries() -> usize {
    10
}

fn default_max_favorites() -> usize {
    20
}

fn default_max_sessions() -> usize {
    100
}

fn default_dataset() -> String {
    "analytics".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind the gateway server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the gateway server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on `/v1/*` routes. `None` disables auth.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}
