//! Column- and row-level null inspection for loaded tables.
//!
//! Both operations borrow the [`DataFrame`] and never modify it.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_datasets::inspect::{check_for_null_entries, filter_incomplete_entries};
//! use polars::prelude::*;
//!
//! let df = df!(
//!     "title" => ["A", "B"],
//!     "rating" => [None, Some("PG")],
//! )?;
//!
//! let report = check_for_null_entries(&df);
//! assert_eq!(report.get("rating"), Some(true));
//!
//! let missing = filter_incomplete_entries(&df, "rating")?;
//! assert_eq!(missing.height(), 1);
//! ```

use crate::error::{DatasetError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Rows used to infer column types when loading CSV files.
const INFER_SCHEMA_ROWS: usize = 100;

/// Null status of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnNullStatus {
    pub name: String,
    pub has_nulls: bool,
    pub null_count: usize,
}

/// Per-column null presence, in the table's column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NullReport {
    pub row_count: usize,
    pub columns: Vec<ColumnNullStatus>,
}

impl NullReport {
    /// Whether `column` contains a null, or `None` for an unknown column.
    pub fn get(&self, column: &str) -> Option<bool> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.has_nulls)
    }

    /// Null count for `column`, or `None` for an unknown column.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.null_count)
    }

    /// Names of the columns containing at least one null.
    pub fn columns_with_nulls(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.has_nulls)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn has_any_nulls(&self) -> bool {
        self.columns.iter().any(|c| c.has_nulls)
    }

    /// Column name to null presence.
    pub fn to_map(&self) -> HashMap<String, bool> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.has_nulls))
            .collect()
    }
}

/// Report, for every column of `df`, whether it holds one or more nulls.
pub fn check_for_null_entries(df: &DataFrame) -> NullReport {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let null_count = col.null_count();
            ColumnNullStatus {
                name: col.name().to_string(),
                has_nulls: null_count > 0,
                null_count,
            }
        })
        .collect();

    NullReport {
        row_count: df.height(),
        columns,
    }
}

/// Rows of `df` whose value in `column` is null, with all columns kept and
/// the original row order preserved.
///
/// # Errors
///
/// Returns [`DatasetError::ColumnNotFound`] if `df` has no column named `column`.
pub fn filter_incomplete_entries(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let col = df
        .column(column)
        .map_err(|_| DatasetError::ColumnNotFound(column.to_string()))?;

    let mask = col.as_materialized_series().is_null();
    let filtered = df.filter(&mask)?;

    debug!(
        "Column '{}': {} of {} rows are null",
        column,
        filtered.height(),
        df.height()
    );
    Ok(filtered)
}

/// Load a CSV file with a header row. Empty fields become nulls.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DatasetError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("CSV file not found: {}", path.display()),
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!("Loaded {} with shape {:?}", path.display(), df.shape());
    Ok(df)
}
