use std::fmt;

use thiserror::Error;

use crate::schema::FieldId;

/// Errors raised while building a schema. Any of these aborts the upload
/// before a single cell is packed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown field type '{type_name}'")]
    UnknownFieldType { type_name: String },

    #[error("field type '{type_name}' cannot be uploaded")]
    UnsupportedFieldType { type_name: String },

    #[error("malformed schema entry '{raw}': {reason}")]
    MalformedSchemaEntry { raw: String, reason: String },

    #[error("field {field_id} is targeted by more than one column: {}", .columns.join(", "))]
    DuplicateFieldId {
        field_id: FieldId,
        columns: Vec<String>,
    },

    #[error("column '{column}': {source}")]
    Column {
        column: String,
        #[source]
        source: Box<SchemaError>,
    },

    #[error("invalid schema source: {message}")]
    InvalidSource { message: String },
}

impl SchemaError {
    pub(crate) fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSchemaEntry {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn in_column(self, column: &str) -> Self {
        Self::Column {
            column: column.to_string(),
            source: Box::new(self),
        }
    }

    /// The underlying error with any column context removed.
    pub fn root(&self) -> &SchemaError {
        match self {
            SchemaError::Column { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Every failure found while parsing a schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors(pub Vec<SchemaError>);

impl SchemaErrors {
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema has {} error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

pub type Result<T> = std::result::Result<T, SchemaError>;
