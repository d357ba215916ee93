// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped temporary copies of a dataset handed to the query engine.

use std::io::{BufWriter, Write};
use std::path::Path;

use raad_core::{RaadError, Table, cell_text};
use tempfile::NamedTempFile;
use tracing::debug;

/// A dataset written to a temporary CSV file.
///
/// The file is deleted when the guard is dropped, on every exit path.
#[derive(Debug)]
pub struct MaterializedDataset {
    file: NamedTempFile,
}

impl MaterializedDataset {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Writes `table` to a fresh temporary file.
pub fn materialize(table: &Table) -> Result<MaterializedDataset, RaadError> {
    let to_err = |e: std::io::Error| RaadError::Materialize {
        source: Box::new(e),
    };

    let mut file = tempfile::Builder::new()
        .prefix("raad-dataset-")
        .suffix(".csv")
        .tempfile()
        .map_err(to_err)?;

    {
        let mut out = BufWriter::new(file.as_file_mut());
        write_csv(table, &mut out).map_err(|e| RaadError::Materialize {
            source: Box::new(e),
        })?;
        out.flush().map_err(to_err)?;
    }

    debug!(
        path = %file.path().display(),
        rows = table.row_count(),
        "dataset materialized"
    );
    Ok(MaterializedDataset { file })
}

/// Serializes a table as CSV with a header row. Nulls become empty fields.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.columns())?;
    for row in table.rows() {
        csv.write_record(row.iter().map(cell_text))?;
    }
    csv.flush()?;
    Ok(())
}
