// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory tabular data: named columns over rows of JSON scalar cells.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows x named columns. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Wire shape of [`Table`]; normalized through [`Table::new`] on the way in.
#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl From<RawTable> for Table {
    fn from(raw: RawTable) -> Self {
        Table::new(raw.columns, raw.rows)
    }
}

impl Table {
    /// Creates a table, padding short rows with nulls and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Builds a table from an array of JSON objects. Column order follows first appearance.
    pub fn from_records(records: &[Value]) -> Option<Self> {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            let obj = record.as_object()?;
            for key in obj.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                columns
                    .iter()
                    .map(|c| obj.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Some(Self { columns, rows })
    }

    /// Interprets a JSON value as a table, if it has a tabular shape.
    ///
    /// Accepted shapes: `{"columns": [...], "rows": [[...]]}` (also `"data"`
    /// instead of `"rows"`, with array or object rows), and a non-empty array
    /// of row objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Object(obj) => {
                let columns: Vec<String> = obj
                    .get("columns")?
                    .as_array()?
                    .iter()
                    .map(|c| match c {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                let rows = obj.get("rows").or_else(|| obj.get("data"))?.as_array()?;
                let rows = rows
                    .iter()
                    .map(|row| match row {
                        Value::Array(cells) => Some(cells.clone()),
                        Value::Object(cells) => Some(
                            columns
                                .iter()
                                .map(|c| cells.get(c).cloned().unwrap_or(Value::Null))
                                .collect(),
                        ),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(Self::new(columns, rows))
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                Self::from_records(items)
            }
            _ => None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates over the cells of one column, top to bottom.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Sorted distinct non-null values of a column, rendered as text.
    pub fn distinct(&self, name: &str) -> Vec<String> {
        let Some(cells) = self.column(name) else {
            return Vec::new();
        };
        cells
            .filter(|v| !v.is_null())
            .map(cell_text)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Projects the table onto the given columns, skipping names that do not exist.
    pub fn select(&self, names: &[String]) -> Table {
        let indices: Vec<(usize, &String)> = names
            .iter()
            .filter_map(|n| self.column_index(n).map(|i| (i, n)))
            .collect();
        Table {
            columns: indices.iter().map(|(_, n)| (*n).clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|(i, _)| row[*i].clone()).collect())
                .collect(),
        }
    }

    /// Keeps rows for which `keep` returns true.
    pub fn filter_rows(&self, mut keep: impl FnMut(&[Value]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

/// Renders a cell as plain text: strings verbatim, null as empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Reads a cell as a float when it holds a number or a numeric string.
pub fn cell_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
