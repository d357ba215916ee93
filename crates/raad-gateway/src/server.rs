// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use raad_agent::SessionRegistry;
use raad_config::{DataConfig, GatewayConfig};
use raad_core::RaadError;
use raad_query::EngineStatus;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

/// Preview sizes used when a request does not give its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewDefaults {
    pub rows: usize,
    pub cols: usize,
}

impl From<&DataConfig> for PreviewDefaults {
    fn from(config: &DataConfig) -> Self {
        Self {
            rows: config.preview_rows,
            cols: config.preview_cols,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Live chat sessions; also reaches the dataset store and engine.
    pub registry: Arc<SessionRegistry>,
    /// Engine configuration summary for the info endpoint.
    pub engine_status: EngineStatus,
    pub preview: PreviewDefaults,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors `GatewayConfig` from raad-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// Builds the full router: public health plus authenticated `/v1` API.
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/datasets", get(handlers::list_datasets))
        .route("/v1/datasets/{name}/columns", get(handlers::get_columns))
        .route("/v1/datasets/{name}/preview", get(handlers::get_preview))
        .route("/v1/info", get(handlers::get_info))
        .route("/v1/examples", get(handlers::get_examples))
        .route("/v1/sessions", post(handlers::create_session))
        .route("/v1/sessions/{id}/dataset", put(handlers::put_dataset))
        .route("/v1/sessions/{id}/messages", post(handlers::post_message))
        .route(
            "/v1/sessions/{id}/history",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .route("/v1/sessions/{id}/recent", get(handlers::get_recent))
        .route(
            "/v1/sessions/{id}/favorites",
            get(handlers::get_favorites)
                .post(handlers::post_favorite)
                .delete(handlers::delete_favorite),
        )
        .route("/v1/sessions/{id}/export", get(handlers::export_history))
        .route("/v1/sessions/{id}", delete(handlers::delete_session))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), RaadError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RaadError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| RaadError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_gateway_config() {
        let config = ServerConfig::from(&GatewayConfig::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(format!("{config:?}").contains("127.0.0.1"));
    }

    #[test]
    fn preview_defaults_from_data_config() {
        let defaults = PreviewDefaults::from(&DataConfig::default());
        assert_eq!(defaults, PreviewDefaults { rows: 5, cols: 6 });
    }
}
