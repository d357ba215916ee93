// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Raad.
//!
//! Serves dataset listings, previews and column references, and runs chat
//! turns against sessions held in a [`raad_agent::SessionRegistry`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, PreviewDefaults, ServerConfig, router, start_server};
