// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `raad serve` command implementation.
//!
//! Loads the datasets up front, then serves the HTTP gateway until SIGINT or
//! SIGTERM.

use std::sync::Arc;

use raad_agent::SessionRegistry;
use raad_config::RaadConfig;
use raad_core::RaadError;
use raad_gateway::{AuthConfig, GatewayState, HealthState, PreviewDefaults, ServerConfig};
use tracing::{info, warn};

use crate::app::App;
use crate::shutdown;

pub async fn run_serve(config: RaadConfig) -> Result<(), RaadError> {
    let app = App::new(config)?;
    let datasets = app.load_data()?;
    for (name, table) in datasets.iter() {
        info!(dataset = %name, rows = table.row_count(), columns = table.column_count(), "dataset loaded");
    }

    if !app.engine_status.configured {
        warn!(
            reason = app.engine_status.error.as_deref().unwrap_or("unknown"),
            "query engine is not configured; questions will return errors"
        );
    }
    if app.config.gateway.bearer_token.is_none() {
        warn!("gateway.bearer_token is not set; the API is unauthenticated");
    }

    let registry = Arc::new(SessionRegistry::new(
        app.dispatcher(),
        app.settings.clone(),
        app.config.session.max_sessions,
    ));
    let state = GatewayState {
        registry,
        engine_status: app.engine_status.clone(),
        preview: PreviewDefaults::from(&app.config.data),
        auth: AuthConfig {
            bearer_token: app.config.gateway.bearer_token.clone(),
        },
        health: HealthState::default(),
    };

    let cancel = shutdown::install_signal_handler();
    raad_gateway::start_server(&ServerConfig::from(&app.config.gateway), state, cancel).await
}

/// Initializes the tracing subscriber.
///
/// `RAAD_LOG` wins, then `RUST_LOG`, then `raad=<log_level>,warn`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("RAAD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("raad={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
