// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Raad.
//!
//! This crate provides the error type, the chat and table types, and the
//! [`QueryEngine`] trait shared by every other crate in the workspace.

pub mod error;
pub mod table;
pub mod traits;
pub mod types;

pub use error::RaadError;
pub use table::{Table, cell_f64, cell_text};
pub use traits::{EngineRequest, QueryEngine};
pub use types::{
    ChatMessage, DatasetName, ERROR_TYPE_KEY, ErrorKind, HealthStatus, QueryOutcome, QueryResult,
    RESPONSE_TYPE_KEY, ResponseType, Role, SessionId,
};
