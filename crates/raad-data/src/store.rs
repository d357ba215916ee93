// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached loading of the four datasets from `<data_dir>/<name>.csv`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use raad_core::{DatasetName, RaadError, Table};
use serde_json::{Number, Value};
use tracing::{debug, info};

/// The four loaded datasets. Read-only once built.
#[derive(Debug, Clone)]
pub struct Datasets {
    filings: Table,
    facts: Table,
    ratios: Table,
    analytics: Table,
}

impl Datasets {
    pub fn new(filings: Table, facts: Table, ratios: Table, analytics: Table) -> Self {
        Self {
            filings,
            facts,
            ratios,
            analytics,
        }
    }

    pub fn get(&self, name: DatasetName) -> &Table {
        match name {
            DatasetName::Filings => &self.filings,
            DatasetName::Facts => &self.facts,
            DatasetName::Ratios => &self.ratios,
            DatasetName::Analytics => &self.analytics,
        }
    }

    /// Iterates datasets in load order.
    pub fn iter(&self) -> impl Iterator<Item = (DatasetName, &Table)> {
        DatasetName::ALL.into_iter().map(|name| (name, self.get(name)))
    }
}

/// Loads the datasets once and hands out the shared copy afterwards.
///
/// The cache slot is guarded by a mutex held across the read, so concurrent
/// first callers wait for one load instead of racing to storage. A failed
/// load caches nothing.
#[derive(Debug)]
pub struct DatasetStore {
    data_dir: PathBuf,
    cache: Mutex<Option<Arc<Datasets>>>,
    loads: AtomicUsize,
}

impl DatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// A store that is already populated and never touches storage.
    pub fn preloaded(datasets: Datasets) -> Self {
        Self {
            data_dir: PathBuf::new(),
            cache: Mutex::new(Some(Arc::new(datasets))),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the cached datasets, reading all four files on first use.
    pub fn load(&self) -> Result<Arc<Datasets>, RaadError> {
        let mut slot = self
            .cache
            .lock()
            .map_err(|_| RaadError::Internal("dataset cache lock poisoned".into()))?;
        if let Some(datasets) = slot.as_ref() {
            return Ok(Arc::clone(datasets));
        }

        self.loads.fetch_add(1, Ordering::SeqCst);
        let datasets = Arc::new(read_all(&self.data_dir)?);
        *slot = Some(Arc::clone(&datasets));
        Ok(datasets)
    }

    /// Number of times storage has been read.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Whether a successful load is cached.
    pub fn is_loaded(&self) -> bool {
        self.cache.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

fn read_all(data_dir: &Path) -> Result<Datasets, RaadError> {
    let read = |name: DatasetName| -> Result<Table, RaadError> {
        let path = data_dir.join(name.file_name());
        let table = read_table(&path).map_err(|reason| RaadError::DataUnavailable {
            dataset: name.to_string(),
            reason,
        })?;
        debug!(
            dataset = %name,
            rows = table.row_count(),
            columns = table.column_count(),
            "dataset read"
        );
        Ok(table)
    };

    let datasets = Datasets::new(
        read(DatasetName::Filings)?,
        read(DatasetName::Facts)?,
        read(DatasetName::Ratios)?,
        read(DatasetName::Analytics)?,
    );
    info!(data_dir = %data_dir.display(), "datasets loaded");
    Ok(datasets)
}

/// Reads one CSV file with a header row into a [`Table`].
pub fn read_table(path: &Path) -> Result<Table, String> {
    if !path.is_file() {
        return Err(format!("file not found: {}", path.display()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok(Table::new(columns, rows))
}

/// Types a raw CSV cell: empty is null, then integer, float, boolean, else string.
///
/// Digit strings with a leading zero (`"0123"`) stay strings so codes keep their padding.
pub fn parse_cell(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Null;
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    let zero_padded = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if !zero_padded {
        if let Ok(i) = s.parse::<i64>() {
            return Value::from(i);
        }
        if let Ok(f) = s.parse::<f64>()
            && let Some(n) = Number::from_f64(f)
            && s.chars().any(|c| c.is_ascii_digit())
        {
            return Value::Number(n);
        }
    }
    match s {
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_cell_types() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell("  "), Value::Null);
        assert_eq!(parse_cell("2024"), json!(2024));
        assert_eq!(parse_cell("-15"), json!(-15));
        assert_eq!(parse_cell("1.5e9"), json!(1.5e9));
        assert_eq!(parse_cell("0.25"), json!(0.25));
        assert_eq!(parse_cell("true"), json!(true));
        assert_eq!(parse_cell("Saudi Aramco"), json!("Saudi Aramco"));
        assert_eq!(parse_cell("0123"), json!("0123"));
        assert_eq!(parse_cell("0"), json!(0));
        assert_eq!(parse_cell("NaN"), json!("NaN"));
        assert_eq!(parse_cell("inf"), json!("inf"));
    }

    #[test]
    fn read_table_missing_file() {
        let err = read_table(Path::new("/nonexistent/filings.csv")).unwrap_err();
        assert!(err.contains("file not found"));
    }

    #[test]
    fn read_table_pads_short_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "a,b,c\n1,x\n2,y,true\n").unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.columns(), &["a", "b", "c"]);
        assert_eq!(table.rows()[0], vec![json!(1), json!("x"), Value::Null]);
        assert_eq!(table.rows()[1][2], json!(true));
    }
}
