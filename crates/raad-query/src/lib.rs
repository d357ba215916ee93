// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query engine adapters for Raad.
//!
//! [`HttpQueryEngine`] posts each question to a query service;
//! [`CommandQueryEngine`] runs a local query program. Both implement
//! [`raad_core::QueryEngine`] and are built from `[engine]` config by
//! [`build_engine`].

pub mod command;
pub mod http;
pub mod key;
pub mod redact;

use std::sync::Arc;

use raad_config::{EngineConfig, EngineKind};
use raad_core::{QueryEngine, RaadError};
use secrecy::SecretString;
use tracing::{info, warn};

pub use command::CommandQueryEngine;
pub use http::HttpQueryEngine;
pub use key::{EngineStatus, resolve_api_key, validate_api_key};
pub use redact::redact;

/// Builds the configured engine.
///
/// A missing or invalid API key is not fatal here: the engine is still built
/// and its health check reports the problem.
pub fn build_engine(
    config: &EngineConfig,
    api_key: Option<SecretString>,
) -> Result<Arc<dyn QueryEngine>, RaadError> {
    if let Err(reason) = validate_api_key(api_key.as_ref(), &config.api_key_env) {
        warn!(reason = %reason, "query engine API key not configured");
    }

    let engine: Arc<dyn QueryEngine> = match config.kind {
        EngineKind::Http => Arc::new(HttpQueryEngine::new(config, api_key)?),
        EngineKind::Command => Arc::new(CommandQueryEngine::new(config, api_key)?),
    };
    info!(engine = engine.name(), model = %config.model, "query engine ready");
    Ok(engine)
}
