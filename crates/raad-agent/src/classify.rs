// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of raw engine answers into [`QueryOutcome`]s.

use std::path::Path;

use raad_core::{QueryOutcome, QueryResult, Table};
use serde_json::Value;
use tracing::debug;

const IMAGE_SUFFIXES: [&str; 5] = [".png", ".jpg", ".jpeg", ".svg", ".gif"];

/// Structural result tag an engine may attach next to `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Text,
    Dataframe,
    Chart,
}

impl Tag {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "number" => Some(Tag::Text),
            "dataframe" | "table" => Some(Tag::Dataframe),
            "chart" | "plot" => Some(Tag::Chart),
            _ => None,
        }
    }
}

/// Classifies a raw engine answer.
///
/// An object carrying `value` is unwrapped first; its `last_code_executed`
/// (or `code`) and `type` fields are kept. Chart references only survive
/// when the file exists at classification time.
pub fn classify(raw: Value) -> QueryOutcome {
    let (payload, code, tag) = unwrap_envelope(raw);

    let result = match tag {
        Some(Tag::Text) => QueryResult::Text(text_of(&payload)),
        Some(Tag::Dataframe) => match Table::from_json(&payload) {
            Some(table) => QueryResult::Table(table),
            None => QueryResult::Text(text_of(&payload)),
        },
        Some(Tag::Chart) => match payload.as_str() {
            Some(path) => chart_or_text(path),
            None => QueryResult::Text(text_of(&payload)),
        },
        None => classify_untagged(&payload),
    };

    debug!(response_type = %result.response_type(), has_code = code.is_some(), "classified engine answer");
    QueryOutcome::new(result).with_code(code)
}

fn unwrap_envelope(raw: Value) -> (Value, Option<String>, Option<Tag>) {
    match raw {
        Value::Object(mut obj) if obj.contains_key("value") => {
            let code = ["last_code_executed", "code"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
                .filter(|c| !c.trim().is_empty())
                .map(str::to_string);
            let tag = obj.get("type").and_then(Value::as_str).and_then(Tag::parse);
            let payload = obj.remove("value").unwrap_or(Value::Null);
            (payload, code, tag)
        }
        other => (other, None, None),
    }
}

fn classify_untagged(payload: &Value) -> QueryResult {
    if let Some(table) = Table::from_json(payload) {
        return QueryResult::Table(table);
    }
    match payload {
        Value::String(s) if looks_like_chart(s) => chart_or_text(s),
        other => QueryResult::Text(text_of(other)),
    }
}

/// Whether a string answer names a chart: an image suffix or the word "chart".
pub fn looks_like_chart(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) || lower.contains("chart")
}

fn chart_or_text(s: &str) -> QueryResult {
    let path = Path::new(s.trim());
    if path.is_file() {
        QueryResult::ChartReference(path.to_path_buf())
    } else {
        debug!(path = %s, "chart path does not exist, treating answer as text");
        QueryResult::Text(s.to_string())
    }
}

/// Plain rendering of a scalar answer: strings verbatim, numbers in plain
/// decimal form, null as empty, anything else as compact JSON.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        other => other.to_string(),
    }
}
