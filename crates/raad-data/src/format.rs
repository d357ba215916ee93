// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric formatting and plain-text table rendering.

use raad_core::{Table, cell_text};
use serde_json::Value;

/// Options for [`format_number_abbreviated`].
#[derive(Debug, Clone, PartialEq)]
pub struct NumberStyle<'a> {
    pub decimals: usize,
    pub prefix: &'a str,
    pub suffix: &'a str,
    /// Prepend `+` to positive values.
    pub force_sign: bool,
}

impl Default for NumberStyle<'_> {
    fn default() -> Self {
        Self {
            decimals: 1,
            prefix: "",
            suffix: "",
            force_sign: false,
        }
    }
}

/// Formats with a K/M/B/T suffix, e.g. `2.5e9` with prefix `"SAR "` is `SAR 2.5B`.
///
/// Non-finite values render as `-`.
pub fn format_number_abbreviated(value: f64, style: &NumberStyle<'_>) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let sign = if style.force_sign && value > 0.0 {
        "+"
    } else {
        ""
    };
    let d = style.decimals;
    let abs = value.abs();
    let body = if abs >= 1e12 {
        format!("{:.d$}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.d$}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.d$}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.d$}K", value / 1e3)
    } else {
        format!("{value:.d$}")
    };
    format!("{sign}{}{body}{}", style.prefix, style.suffix)
}

/// Formats a value in Saudi riyals, abbreviated or with thousands separators.
pub fn format_currency(value: f64, abbreviated: bool, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if abbreviated {
        format_number_abbreviated(
            value,
            &NumberStyle {
                decimals,
                prefix: "SAR ",
                ..NumberStyle::default()
            },
        )
    } else {
        format!("SAR {}", group_thousands(value, decimals))
    }
}

/// Formats a percentage. With `is_decimal`, `0.25` is `25.00%`.
pub fn format_percentage(value: f64, is_decimal: bool, decimals: usize, force_sign: bool) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let pct = if is_decimal { value * 100.0 } else { value };
    let sign = if force_sign && pct > 0.0 { "+" } else { "" };
    format!("{sign}{pct:.decimals$}%")
}

/// Relative change from `previous` to `current` with its signed percentage text.
///
/// `None` when `previous` is zero or either value is not finite.
pub fn delta_percentage(current: f64, previous: f64, decimals: usize) -> Option<(f64, String)> {
    if !current.is_finite() || !previous.is_finite() || previous == 0.0 {
        return None;
    }
    let delta = (current - previous) / previous.abs();
    let sign = if delta > 0.0 { "+" } else { "" };
    Some((delta, format!("{sign}{:.decimals$}%", delta * 100.0)))
}

/// `1234567.891` with 2 decimals is `1,234,567.89`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.decimals$}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Renders a table as aligned plain text: header, dash rule, rows.
///
/// Numbers are right-aligned and everything else left-aligned.
pub fn render_text_table(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = table
        .columns()
        .iter()
        .zip(&widths)
        .map(|(name, w)| pad_right(name, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for (row, texts) in table.rows().iter().zip(&cells) {
        let line: Vec<String> = row
            .iter()
            .zip(texts)
            .zip(&widths)
            .map(|((value, text), w)| match value {
                Value::Number(_) => pad_left(text, *w),
                _ => pad_right(text, *w),
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn pad_right(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(n)))
}

fn pad_left(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{}{s}", " ".repeat(width.saturating_sub(n)))
}
