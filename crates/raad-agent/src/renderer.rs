// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a query outcome into a display action and one recorded assistant turn.

use std::path::PathBuf;

use raad_core::{ChatMessage, ERROR_TYPE_KEY, QueryOutcome, QueryResult, RESPONSE_TYPE_KEY, Table};
use serde::Serialize;

use crate::history::SessionHistory;

/// Content recorded for a chart answer.
pub const CHART_CONTENT: &str = "Chart generated successfully";

/// What the interactive surface should show for an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DisplayAction {
    Text(String),
    Table(Table),
    Chart(PathBuf),
}

/// Records exactly one assistant message for `outcome` and returns what to display.
///
/// Tables are returned for display only; history keeps a row count. A
/// recovered failure also records its error kind under `error_type`.
pub fn render_and_record(outcome: QueryOutcome, history: &mut SessionHistory) -> DisplayAction {
    let response_type = outcome.result.response_type();
    let error = outcome.error;
    let (message, display) = match outcome.result {
        QueryResult::Text(text) => (ChatMessage::assistant(text.clone()), DisplayAction::Text(text)),
        QueryResult::Table(table) => (
            ChatMessage::assistant(format!("{} rows", table.row_count())),
            DisplayAction::Table(table),
        ),
        QueryResult::ChartReference(path) => (
            ChatMessage::assistant(CHART_CONTENT).with_artifact(path.clone()),
            DisplayAction::Chart(path),
        ),
    };

    let mut message = message
        .with_metadata(RESPONSE_TYPE_KEY, <&'static str>::from(response_type))
        .with_code(outcome.code);
    if let Some(kind) = error {
        message = message.with_metadata(ERROR_TYPE_KEY, <&'static str>::from(kind));
    }
    history.append(message);
    display
}
