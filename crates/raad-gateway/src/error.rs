// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`RaadError`] onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use raad_core::RaadError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`RaadError`] returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub RaadError);

impl From<RaadError> for ApiError {
    fn from(err: RaadError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RaadError::UnknownDataset(_)
            | RaadError::InvalidQuestion(_)
            | RaadError::InvalidRole(_) => StatusCode::BAD_REQUEST,
            RaadError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            RaadError::SessionBusy(_) => StatusCode::CONFLICT,
            RaadError::SessionLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            RaadError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RaadError::QueryExecution { .. } | RaadError::Materialize { .. } => {
                StatusCode::BAD_GATEWAY
            }
            RaadError::Config(_) | RaadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
