//! Source tables read from CSV.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options for reading a source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReadOptions {
    /// Infer column types from the data. When false every column is read as
    /// text, which keeps leading zeros in codes and phone numbers.
    pub infer_types: bool,
    /// Rows sampled for type inference.
    pub infer_schema_length: usize,
}

impl Default for TableReadOptions {
    fn default() -> Self {
        Self {
            infer_types: true,
            infer_schema_length: 100,
        }
    }
}

impl TableReadOptions {
    #[must_use]
    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Read a CSV file with a header row into a [`DataFrame`].
pub fn read_table(path: &Path) -> Result<DataFrame> {
    read_table_with_options(path, &TableReadOptions::default())
}

pub fn read_table_with_options(path: &Path, options: &TableReadOptions) -> Result<DataFrame> {
    let infer_length = if options.infer_types {
        options.infer_schema_length
    } else {
        0
    };
    debug!(path = %path.display(), infer_length, "reading table");
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_length))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read CSV: {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table loaded"
    );
    Ok(df)
}
