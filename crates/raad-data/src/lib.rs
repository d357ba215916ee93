// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dataset store for Raad.
//!
//! Loads the four financial datasets (`filings`, `facts`, `ratios`,
//! `analytics`) from CSV files once per store, materializes a dataset into a
//! scoped temporary file for the query engine, and provides the pure
//! presentation helpers used by the gateway and the shell.

pub mod catalog;
pub mod export;
pub mod format;
pub mod materialize;
pub mod preview;
pub mod store;
pub mod verify;

pub use catalog::{DatasetSummary, description, display_name, summaries};
pub use export::{export_filename, table_to_csv, write_export};
pub use format::{
    NumberStyle, delta_percentage, format_currency, format_number_abbreviated, format_percentage,
    render_text_table,
};
pub use materialize::{MaterializedDataset, materialize};
pub use preview::{
    ColumnReference, DEFAULT_PREVIEW_COLS, KEY_COLUMNS, PreviewStats, StoreInfo, column_reference,
    preview, preview_columns,
};
pub use store::{DatasetStore, Datasets};
pub use verify::{CheckStatus, VerifyReport, verify};
