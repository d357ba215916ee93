// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sanity report over the `analytics` dataset.
//!
//! Ranks 2024 revenue and checks that well-known facts about the market
//! still hold after normalization.

use std::fmt;

use raad_core::{DatasetName, Table, cell_f64, cell_text};
use serde::Serialize;
use serde_json::Value;

use crate::format::format_currency;
use crate::store::Datasets;

const VERIFY_YEAR: i64 = 2024;
const TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    Info,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Info => "INFO",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub status: CheckStatus,
    pub message: String,
}

impl Check {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCompany {
    pub rank: usize,
    pub company_name: String,
    pub revenue: f64,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyReport {
    pub year: i64,
    pub top_revenue: Vec<RankedCompany>,
    pub checks: Vec<Check>,
}

impl VerifyReport {
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "Top {TOP_N} Companies by Revenue ({})", self.year)?;
        writeln!(f, "{rule}")?;
        for row in &self.top_revenue {
            let name: String = row.company_name.chars().take(40).collect();
            writeln!(
                f,
                "{:>2}. {name:<40} {:>12}  ({})",
                row.rank,
                format_currency(row.revenue, true, 1),
                row.sector
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Verification Checklist:")?;
        writeln!(f, "{rule}")?;
        for check in &self.checks {
            writeln!(f, "[{}] {}", check.status, check.message)?;
        }
        write!(f, "{rule}")
    }
}

/// Builds the report from the loaded datasets.
pub fn verify(datasets: &Datasets) -> VerifyReport {
    verify_analytics(datasets.get(DatasetName::Analytics))
}

/// Builds the report from an `analytics`-shaped table.
pub fn verify_analytics(analytics: &Table) -> VerifyReport {
    let top = top_revenue(analytics, VERIFY_YEAR, TOP_N);
    let mut checks = Vec::new();

    match top.first() {
        Some(first) => {
            let lower = first.company_name.to_lowercase();
            if lower.contains("aramco") || lower.contains("saudi arabian oil") {
                checks.push(Check::new(
                    CheckStatus::Pass,
                    "Saudi Aramco (Saudi Arabian Oil Co.) is #1 by revenue",
                ));
            } else {
                checks.push(Check::new(
                    CheckStatus::Fail,
                    format!(
                        "Top company is '{}', expected Saudi Aramco",
                        first.company_name
                    ),
                ));
            }
        }
        None => checks.push(Check::new(
            CheckStatus::Fail,
            format!("No {VERIFY_YEAR} revenue rows found"),
        )),
    }

    if top
        .iter()
        .any(|r| r.company_name.to_lowercase().contains("arabian contracting"))
    {
        checks.push(Check::new(
            CheckStatus::Fail,
            "Arabian Contracting is in top 10 (data not normalized)",
        ));
    } else {
        checks.push(Check::new(
            CheckStatus::Pass,
            "Arabian Contracting is NOT in top 10 (as expected)",
        ));
    }

    checks.push(scale_factor_check(analytics));

    VerifyReport {
        year: VERIFY_YEAR,
        top_revenue: top,
        checks,
    }
}

fn top_revenue(analytics: &Table, year: i64, n: usize) -> Vec<RankedCompany> {
    let (Some(year_idx), Some(revenue_idx)) = (
        analytics.column_index("fiscal_year"),
        analytics.column_index("revenue"),
    ) else {
        return Vec::new();
    };
    let name_idx = analytics.column_index("company_name");
    let sector_idx = analytics.column_index("sector");

    let mut rows: Vec<RankedCompany> = analytics
        .rows()
        .iter()
        .filter(|row| cell_f64(&row[year_idx]).is_some_and(|y| y == year as f64))
        .filter_map(|row| {
            let revenue = cell_f64(&row[revenue_idx])?;
            let text = |idx: Option<usize>| idx.map(|i| cell_text(&row[i])).unwrap_or_default();
            Some(RankedCompany {
                rank: 0,
                company_name: text(name_idx),
                revenue,
                sector: text(sector_idx),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows.truncate(n);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

fn scale_factor_check(analytics: &Table) -> Check {
    let Some(cells) = analytics.column("scale_factor") else {
        return Check::new(CheckStatus::Info, "No scale_factor column present");
    };
    let mut distinct: Vec<&Value> = Vec::new();
    for cell in cells {
        if !distinct.contains(&cell) {
            distinct.push(cell);
        }
    }
    let normalized = distinct.len() == 1 && cell_f64(distinct[0]) == Some(1.0);
    if normalized {
        Check::new(CheckStatus::Pass, "All scale_factor values are 1 (normalized)")
    } else {
        let shown: Vec<String> = distinct.iter().map(|v| cell_text(v)).collect();
        Check::new(
            CheckStatus::Fail,
            format!("Scale factors not normalized: [{}]", shown.join(", ")),
        )
    }
}
