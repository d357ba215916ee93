// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamped exports of tables and conversation transcripts.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use raad_core::{RaadError, Table};
use tracing::info;

use crate::materialize::write_csv;

/// `<base>_<YYYYmmdd_HHMMSS>.<extension>`, stamped in UTC like chat turns.
pub fn export_filename(base: &str, extension: &str, at: &DateTime<Utc>) -> String {
    format!("{base}_{}.{extension}", at.format("%Y%m%d_%H%M%S"))
}

/// The table as CSV text with a header row.
pub fn table_to_csv(table: &Table) -> Result<String, RaadError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf).map_err(|e| RaadError::Internal(format!("csv export: {e}")))?;
    String::from_utf8(buf).map_err(|e| RaadError::Internal(format!("csv export: {e}")))
}

/// Writes `contents` to `dir/file_name`, creating `dir` when needed.
pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, RaadError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| RaadError::Internal(format!("create {}: {e}", dir.display())))?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents)
        .map_err(|e| RaadError::Internal(format!("write {}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn filename_carries_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 1, 31, 9, 5, 7).unwrap();
        assert_eq!(export_filename("data", "csv", &at), "data_20260131_090507.csv");
    }

    #[test]
    fn csv_text_and_file() {
        let table = Table::new(
            vec!["sector".into(), "roe".into()],
            vec![vec![json!("Energy"), json!(0.21)]],
        );
        let csv = table_to_csv(&table).unwrap();
        assert_eq!(csv, "sector,roe\nEnergy,0.21\n");

        let dir = tempfile::tempdir().unwrap();
        let path = write_export(&dir.path().join("nested"), "data.csv", &csv).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), csv);
    }
}
