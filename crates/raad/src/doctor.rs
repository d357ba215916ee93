// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `raad doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration, the dataset files and
//! the query engine.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use raad_config::RaadConfig;
use raad_core::{DatasetName, HealthStatus, RaadError};
use raad_data::DatasetStore;

use crate::app::App;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `raad doctor` command. With `plain`, disables colored output.
pub async fn run_doctor(config: &RaadConfig, plain: bool) -> Result<(), RaadError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let app = App::new(config.clone())?;

    let mut results = vec![CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        "valid",
        Instant::now(),
    )];
    results.extend(check_dataset_files(config));
    results.push(check_data_load(&app.store));
    results.push(check_engine_key(&app));
    results.push(check_engine_health(&app).await);
    results.push(check_exports_dir(config));

    println!();
    println!("  raad doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        let line = if use_color {
            use colored::Colorize;
            let (symbol, message) = match result.status {
                CheckStatus::Pass => ("✓".green(), result.message.normal()),
                CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
                CheckStatus::Fail => ("✗".red(), result.message.red()),
            };
            format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
        } else {
            let tag = match result.status {
                CheckStatus::Pass => "[OK]  ",
                CheckStatus::Warn => "[WARN]",
                CheckStatus::Fail => "[FAIL]",
            };
            format!("    {tag} {:<20} {} ({duration_ms}ms)", result.name, result.message)
        };
        println!("{line}");
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn check_dataset_files(config: &RaadConfig) -> Vec<CheckResult> {
    DatasetName::ALL
        .into_iter()
        .map(|name| {
            let start = Instant::now();
            let path = config.data.data_dir.join(name.file_name());
            let label = format!("Dataset {name}");
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => CheckResult::new(
                    &label,
                    CheckStatus::Pass,
                    format!("{} ({} bytes)", path.display(), meta.len()),
                    start,
                ),
                _ => CheckResult::new(
                    &label,
                    CheckStatus::Fail,
                    format!("not found: {}", path.display()),
                    start,
                ),
            }
        })
        .collect()
}

fn check_data_load(store: &DatasetStore) -> CheckResult {
    let start = Instant::now();
    match store.load() {
        Ok(datasets) => {
            let rows: usize = datasets.iter().map(|(_, t)| t.row_count()).sum();
            CheckResult::new("Data load", CheckStatus::Pass, format!("{rows} rows"), start)
        }
        Err(e) => CheckResult::new("Data load", CheckStatus::Fail, e.to_string(), start),
    }
}

fn check_engine_key(app: &App) -> CheckResult {
    let start = Instant::now();
    let status = &app.engine_status;
    if status.configured {
        CheckResult::new(
            "API key",
            CheckStatus::Pass,
            format!("set ({})", app.config.engine.api_key_env),
            start,
        )
    } else {
        CheckResult::new(
            "API key",
            CheckStatus::Fail,
            status.error.clone().unwrap_or_else(|| "not configured".into()),
            start,
        )
    }
}

async fn check_engine_health(app: &App) -> CheckResult {
    let start = Instant::now();
    let label = "Query engine";
    match app.engine.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            label,
            CheckStatus::Pass,
            format!("{} ({})", app.engine.name(), app.engine_status.model_display),
            start,
        ),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new(label, CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new(label, CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new(label, CheckStatus::Fail, e.to_string(), start),
    }
}

fn check_exports_dir(config: &RaadConfig) -> CheckResult {
    let start = Instant::now();
    let dir = &config.data.exports_dir;
    if dir.is_dir() {
        CheckResult::new("Exports", CheckStatus::Pass, dir.display().to_string(), start)
    } else {
        CheckResult::new(
            "Exports",
            CheckStatus::Warn,
            format!("not found: {} (will be created on first export)", dir.display()),
            start,
        )
    }
}
