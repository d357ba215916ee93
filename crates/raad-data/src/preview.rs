// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Previews, column references and store-wide counts.

use std::collections::BTreeSet;

use raad_core::{DatasetName, Table};
use serde::Serialize;

use crate::store::Datasets;

/// Columns shown first in previews when a dataset has them.
pub const KEY_COLUMNS: &[&str] = &[
    "company_name",
    "symbol",
    "sector",
    "fiscal_year",
    "period_end",
    "revenue",
    "net_profit",
    "total_assets",
    "metric",
    "value",
    "ratio",
];

pub const DEFAULT_PREVIEW_COLS: usize = 6;

const COMPANY_COLUMNS: &[&str] = &[
    "company_name",
    "company_folder",
    "sector",
    "symbol",
    "ticker",
    "isin",
    "sector_primary",
    "industry",
];

const PERIOD_COLUMNS: &[&str] = &[
    "period_end",
    "fiscal_year",
    "filing_id",
    "currency",
    "currency_code",
    "rounding",
    "scale_factor",
];

/// Key columns present in `table` first, then the rest in table order, capped at `max_cols`.
pub fn preview_columns(table: &Table, max_cols: usize) -> Vec<String> {
    let mut cols: Vec<String> = KEY_COLUMNS
        .iter()
        .filter(|k| table.has_column(k))
        .map(|k| k.to_string())
        .collect();
    for col in table.columns() {
        if cols.len() >= max_cols {
            break;
        }
        if !cols.contains(col) {
            cols.push(col.clone());
        }
    }
    cols.truncate(max_cols);
    cols
}

/// The first `max_rows` rows over the preview columns.
pub fn preview(table: &Table, max_rows: usize, max_cols: usize) -> Table {
    table.select(&preview_columns(table, max_cols)).head(max_rows)
}

/// Quick stats shown alongside a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewStats {
    pub rows: usize,
    pub columns: usize,
    /// Distinct `company_name` values, when the column exists.
    pub companies: Option<usize>,
}

impl PreviewStats {
    pub fn of(table: &Table) -> Self {
        Self {
            rows: table.row_count(),
            columns: table.column_count(),
            companies: table
                .has_column("company_name")
                .then(|| table.distinct("company_name").len()),
        }
    }
}

/// Columns of a dataset, plus the value catalog that matters for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnReference {
    /// Plain column list.
    Columns { columns: Vec<String> },
    /// `facts`: columns plus the distinct metric names.
    Metrics {
        columns: Vec<String>,
        metrics: Vec<String>,
    },
    /// `ratios`: columns plus the distinct ratio names.
    Ratios {
        columns: Vec<String>,
        ratios: Vec<String>,
    },
    /// `analytics`: columns grouped by what they describe; metric columns sorted.
    Grouped {
        company: Vec<String>,
        period: Vec<String>,
        metrics: Vec<String>,
    },
}

impl ColumnReference {
    /// Total number of columns described.
    pub fn column_count(&self) -> usize {
        match self {
            ColumnReference::Columns { columns }
            | ColumnReference::Metrics { columns, .. }
            | ColumnReference::Ratios { columns, .. } => columns.len(),
            ColumnReference::Grouped {
                company,
                period,
                metrics,
            } => company.len() + period.len() + metrics.len(),
        }
    }
}

pub fn column_reference(name: DatasetName, table: &Table) -> ColumnReference {
    let columns = table.columns().to_vec();
    match name {
        DatasetName::Filings => ColumnReference::Columns { columns },
        DatasetName::Facts => ColumnReference::Metrics {
            metrics: table.distinct("metric"),
            columns,
        },
        DatasetName::Ratios => ColumnReference::Ratios {
            ratios: table.distinct("ratio"),
            columns,
        },
        DatasetName::Analytics => {
            let company = columns
                .iter()
                .filter(|c| in_group(COMPANY_COLUMNS, c))
                .cloned()
                .collect();
            let period = columns
                .iter()
                .filter(|c| in_group(PERIOD_COLUMNS, c))
                .cloned()
                .collect();
            let mut metrics: Vec<String> = columns
                .iter()
                .filter(|c| !in_group(COMPANY_COLUMNS, c) && !in_group(PERIOD_COLUMNS, c))
                .cloned()
                .collect();
            metrics.sort();
            ColumnReference::Grouped {
                company,
                period,
                metrics,
            }
        }
    }
}

/// Store-wide counts for the info panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreInfo {
    /// Distinct companies in `filings`.
    pub companies: usize,
    /// Rows in `analytics`, one per company and period.
    pub periods: usize,
    /// Distinct metrics in `facts`.
    pub metrics: usize,
    /// Distinct ratios in `ratios`.
    pub ratios: usize,
}

impl StoreInfo {
    pub fn of(datasets: &Datasets) -> Self {
        let filings = datasets.get(DatasetName::Filings);
        let companies = if filings.has_column("company_name") {
            filings.distinct("company_name").len()
        } else {
            filings.row_count()
        };
        Self {
            companies,
            periods: datasets.get(DatasetName::Analytics).row_count(),
            metrics: distinct_count(datasets.get(DatasetName::Facts), "metric"),
            ratios: distinct_count(datasets.get(DatasetName::Ratios), "ratio"),
        }
    }
}

fn in_group(group: &[&str], column: &str) -> bool {
    group.contains(&column)
}

fn distinct_count(table: &Table, column: &str) -> usize {
    table
        .column(column)
        .map(|cells| {
            cells
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
                .collect::<BTreeSet<_>>()
                .len()
        })
        .unwrap_or(0)
}
