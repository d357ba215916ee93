// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use raad_agent::{DisplayAction, EXAMPLE_QUESTIONS, ExampleQuestion, RecentQuery, SessionHandle};
use raad_core::{ChatMessage, DatasetName, ErrorKind, RaadError};
use raad_data::{
    ColumnReference, DatasetSummary, Datasets, PreviewStats, StoreInfo, column_reference,
    export_filename, preview, summaries,
};
use raad_query::EngineStatus;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorResponse};
use crate::server::GatewayState;

type ApiResult<T> = Result<T, ApiError>;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<DatasetSummary>,
}

#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    pub dataset: DatasetName,
    #[serde(flatten)]
    pub reference: ColumnReference,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub dataset: DatasetName,
    pub table: raad_core::Table,
    pub stats: PreviewStats,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub store: StoreInfo,
    pub engine: EngineStatus,
}

#[derive(Debug, Serialize)]
pub struct ExamplesResponse {
    pub examples: &'static [ExampleQuestion],
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub dataset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub dataset: DatasetName,
}

#[derive(Debug, Deserialize)]
pub struct SelectDatasetRequest {
    pub dataset: String,
}

/// Request body for POST /v1/sessions/{id}/messages.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub question: String,
}

/// Response body for POST /v1/sessions/{id}/messages.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub session_id: String,
    pub dataset: DatasetName,
    pub display: DisplayAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Category of a failed query; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
    /// ISO 8601 timestamp.
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct RecentQueriesResponse {
    pub session_id: String,
    pub queries: Vec<RecentQuery>,
}

/// Body of POST and query of DELETE on /v1/sessions/{id}/favorites.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub session_id: String,
    pub favorites: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Number of most recent messages; 0 or absent means all.
    #[serde(default)]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

fn datasets(state: &GatewayState) -> ApiResult<Arc<Datasets>> {
    Ok(state.registry.dispatcher().store().load()?)
}

fn session(state: &GatewayState, id: &str) -> ApiResult<SessionHandle> {
    Ok(state.registry.get(id)?)
}

/// GET /health
///
/// Public health endpoint. Does not touch the datasets or the engine.
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /v1/datasets
pub async fn list_datasets(State(state): State<GatewayState>) -> ApiResult<Json<DatasetsResponse>> {
    let datasets = datasets(&state)?;
    Ok(Json(DatasetsResponse {
        datasets: summaries(&datasets),
    }))
}

/// GET /v1/datasets/{name}/columns
pub async fn get_columns(
    State(state): State<GatewayState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ColumnsResponse>> {
    let dataset = DatasetName::parse(&name)?;
    let datasets = datasets(&state)?;
    Ok(Json(ColumnsResponse {
        dataset,
        reference: column_reference(dataset, datasets.get(dataset)),
    }))
}

/// GET /v1/datasets/{name}/preview?rows=&cols=
pub async fn get_preview(
    State(state): State<GatewayState>,
    Path(name): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Json<PreviewResponse>> {
    let dataset = DatasetName::parse(&name)?;
    let datasets = datasets(&state)?;
    let table = datasets.get(dataset);
    let rows = query.rows.unwrap_or(state.preview.rows);
    let cols = query.cols.unwrap_or(state.preview.cols).max(1);
    Ok(Json(PreviewResponse {
        dataset,
        table: preview(table, rows, cols),
        stats: PreviewStats::of(table),
    }))
}

/// GET /v1/info
pub async fn get_info(State(state): State<GatewayState>) -> ApiResult<Json<InfoResponse>> {
    let datasets = datasets(&state)?;
    Ok(Json(InfoResponse {
        store: StoreInfo::of(&datasets),
        engine: state.engine_status.clone(),
    }))
}

/// GET /v1/examples
pub async fn get_examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: EXAMPLE_QUESTIONS,
    })
}

/// POST /v1/sessions
///
/// The body is optional; `{"dataset": "..."}` selects a non-default dataset.
pub async fn create_session(
    State(state): State<GatewayState>,
    body: Option<Json<CreateSessionRequest>>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let id = state.registry.create(request.dataset.as_deref())?;
    let dataset = session(&state, &id.0)?.lock().await.dataset();
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: id.0,
            dataset,
        }),
    ))
}

/// DELETE /v1/sessions/{id}
pub async fn delete_session(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.registry.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(RaadError::SessionNotFound(id).into())
    }
}

/// PUT /v1/sessions/{id}/dataset
pub async fn put_dataset(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<SelectDatasetRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let mut session = state.registry.try_acquire(&id)?;
    let dataset = session.select_dataset(&body.dataset)?;
    Ok(Json(SessionResponse {
        session_id: id,
        dataset,
    }))
}

/// POST /v1/sessions/{id}/messages
///
/// Runs one turn. A session answers one question at a time; a concurrent
/// request gets `409 Conflict`.
pub async fn post_message(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut session = state.registry.try_acquire(&id)?;
    let reply = session.ask(&body.question).await?;
    Ok(Json(MessageResponse {
        session_id: id,
        dataset: session.dataset(),
        display: reply.display,
        code: reply.code,
        error_type: reply.error_type,
        created_at: chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /v1/sessions/{id}/recent
pub async fn get_recent(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecentQueriesResponse>> {
    let handle = session(&state, &id)?;
    let queries = handle.lock().await.recent_queries().to_vec();
    Ok(Json(RecentQueriesResponse {
        session_id: id,
        queries,
    }))
}

/// GET /v1/sessions/{id}/favorites
pub async fn get_favorites(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FavoritesResponse>> {
    let handle = session(&state, &id)?;
    let favorites = handle.lock().await.favorites().to_vec();
    Ok(Json(FavoritesResponse {
        session_id: id,
        favorites,
    }))
}

/// POST /v1/sessions/{id}/favorites
///
/// `201 Created` when the question was added, `200 OK` when it was already saved.
pub async fn post_favorite(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<FavoriteRequest>,
) -> ApiResult<(StatusCode, Json<FavoritesResponse>)> {
    let mut session = state.registry.try_acquire(&id)?;
    let added = session.add_favorite(&body.query)?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(FavoritesResponse {
            session_id: id,
            favorites: session.favorites().to_vec(),
        }),
    ))
}

/// DELETE /v1/sessions/{id}/favorites?query=...
pub async fn delete_favorite(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(query): Query<FavoriteRequest>,
) -> ApiResult<Response> {
    let mut session = state.registry.try_acquire(&id)?;
    if session.remove_favorite(&query.query) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let body = ErrorResponse {
        error: format!("favorite not found: {}", query.query),
    };
    Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
}

/// GET /v1/sessions/{id}/history?limit=n
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let handle = session(&state, &id)?;
    let session = handle.lock().await;
    Ok(Json(HistoryResponse {
        session_id: id,
        messages: session.history().recent(query.limit).to_vec(),
    }))
}

/// DELETE /v1/sessions/{id}/history
pub async fn delete_history(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let handle = session(&state, &id)?;
    handle.lock().await.clear_history();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/sessions/{id}/export
///
/// Markdown transcript, offered as a download.
pub async fn export_history(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let handle = session(&state, &id)?;
    let now = chrono::Utc::now();
    let markdown = handle.lock().await.history().to_markdown_at(now);
    let file_name = export_filename("chat_history", "md", &now);
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        markdown,
    )
        .into_response())
}
