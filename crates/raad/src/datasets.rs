// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `raad datasets` and `raad verify` command implementations.

use raad_config::RaadConfig;
use raad_core::{RaadError, Table};
use raad_data::{StoreInfo, render_text_table, summaries, verify};
use serde_json::json;

use crate::app::App;

pub fn run_datasets(config: RaadConfig) -> Result<(), RaadError> {
    let app = App::new(config)?;
    let datasets = app.load_data()?;

    let info = StoreInfo::of(&datasets);
    println!(
        "{} companies, {} company periods, {} metrics, {} ratios",
        info.companies, info.periods, info.metrics, info.ratios
    );
    println!();

    let rows = summaries(&datasets)
        .into_iter()
        .map(|s| {
            vec![
                json!(s.name.to_string()),
                json!(s.display_name),
                json!(s.rows),
                json!(s.columns),
                json!(s.description),
            ]
        })
        .collect();
    let table = Table::new(
        ["name", "dataset", "rows", "columns", "description"]
            .map(String::from)
            .to_vec(),
        rows,
    );
    print!("{}", render_text_table(&table));
    Ok(())
}

/// Prints the verification report. Returns whether every check passed.
pub fn run_verify(config: RaadConfig) -> Result<bool, RaadError> {
    let app = App::new(config)?;
    let datasets = app.load_data()?;
    let report = verify(&datasets);
    println!("{report}");
    Ok(!report.has_failures())
}
