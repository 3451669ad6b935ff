use std::fmt;

use polars::error::PolarsError;
use qb_model::FieldId;
use serde::Serialize;
use thiserror::Error;

/// Category of a per-cell packing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackingErrorKind {
    DateFormat,
    PhoneFormat,
    BooleanParse,
    ValueType,
}

impl PackingErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackingErrorKind::DateFormat => "date-format",
            PackingErrorKind::PhoneFormat => "phone-format",
            PackingErrorKind::BooleanParse => "boolean-parse",
            PackingErrorKind::ValueType => "value-type",
        }
    }
}

impl fmt::Display for PackingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell that could not be packed, without row or column context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {reason}")]
pub struct CellError {
    pub kind: PackingErrorKind,
    pub reason: String,
}

impl CellError {
    pub fn new(kind: PackingErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn value_type(reason: impl Into<String>) -> Self {
        Self::new(PackingErrorKind::ValueType, reason)
    }
}

/// A cell that could not be packed, located by row and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("row {row}, column '{column}' (field {field_id}), value '{raw}': {reason}")]
pub struct PackingError {
    pub row: usize,
    pub column: String,
    pub field_id: FieldId,
    pub raw: String,
    pub kind: PackingErrorKind,
    pub reason: String,
}

/// Failures that stop a transform as a whole.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("schema columns missing from the table: {}", .columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    #[error("table columns not mapped by the schema: {}", .columns.join(", "))]
    UnmappedColumns { columns: Vec<String> },

    #[error("column '{column}' ({field_type}): {reason}")]
    InvalidFormatArgs {
        column: String,
        field_type: String,
        reason: String,
    },

    #[error("{errors} packing error(s) in {rows} row(s) must be corrected before sending")]
    UnresolvedPackingErrors { errors: usize, rows: usize },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
