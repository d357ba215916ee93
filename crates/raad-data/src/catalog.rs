// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dataset display names, descriptions and per-dataset summaries.

use raad_core::DatasetName;
use serde::Serialize;

use crate::store::Datasets;

pub fn display_name(name: DatasetName) -> &'static str {
    match name {
        DatasetName::Analytics => "Analytics View (Pre-joined)",
        DatasetName::Filings => "Company Filings (Metadata)",
        DatasetName::Facts => "Financial Facts (Metrics)",
        DatasetName::Ratios => "Financial Ratios",
    }
}

pub fn description(name: DatasetName) -> &'static str {
    match name {
        DatasetName::Analytics => {
            "Pre-joined view with all metrics and ratios - best for most queries"
        }
        DatasetName::Filings => "Company metadata including sector, symbol, and fiscal year info",
        DatasetName::Facts => "Raw financial metrics, one row per company, period and metric",
        DatasetName::Ratios => "Calculated financial ratios, one row per company, period and ratio",
    }
}

/// One row of the dataset listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub name: DatasetName,
    pub display_name: &'static str,
    pub description: &'static str,
    pub rows: usize,
    pub columns: usize,
}

/// Summaries of all four datasets, in load order.
pub fn summaries(datasets: &Datasets) -> Vec<DatasetSummary> {
    datasets
        .iter()
        .map(|(name, table)| DatasetSummary {
            name,
            display_name: display_name(name),
            description: description(name),
            rows: table.row_count(),
            columns: table.column_count(),
        })
        .collect()
}
