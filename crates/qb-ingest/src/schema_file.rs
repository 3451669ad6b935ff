//! Schema files: JSON objects of column entries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use qb_model::{Schema, SchemaSource};
use tracing::info;

/// Read a schema file without validating its entries.
pub fn load_schema_source(path: &Path) -> Result<SchemaSource> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read schema file {}", path.display()))?;
    SchemaSource::from_json_str(&text)
        .with_context(|| format!("parse schema file {}", path.display()))
}

/// Read and validate a schema file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let source = load_schema_source(path)?;
    let schema = source
        .parse()
        .with_context(|| format!("invalid schema in {}", path.display()))?;
    info!(
        path = %path.display(),
        columns = schema.len(),
        fields = schema.groups().count(),
        "schema loaded"
    );
    Ok(schema)
}
