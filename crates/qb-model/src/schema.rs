//! Column specifications and the per-upload schema.
//!
//! A schema maps source column names to destination fields. Each entry is a
//! whitespace-delimited spec string, `"<fieldId> <type> <args...>"`, e.g.
//! `"8 date %m/%d/%Y"` or `"11 phone-number (###) ###-####"`.
//!
//! The parser only validates the field id and the type name. Format arguments
//! are kept verbatim and checked by the packing strategy that consumes them.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchemaError, SchemaErrors};
use crate::registry::{self, FieldType, PackingStrategy};

/// Identifier of a destination field. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(NonZeroU32);

impl FieldId {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(FieldId::new)
            .ok_or_else(|| {
                SchemaError::malformed(s, format!("field id '{s}' is not a positive integer"))
            })
    }
}

/// A parsed schema entry for one source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    field_id: FieldId,
    field_type: &'static FieldType,
    strategy: PackingStrategy,
    format_args: Vec<String>,
}

impl ColumnSpec {
    pub fn field_id(&self) -> FieldId {
        self.field_id
    }

    pub fn field_type(&self) -> &'static FieldType {
        self.field_type
    }

    pub fn strategy(&self) -> PackingStrategy {
        self.strategy
    }

    pub fn format_args(&self) -> &[String] {
        &self.format_args
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field_id, self.field_type.name)?;
        for arg in &self.format_args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl FromStr for ColumnSpec {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_column_spec(s)
    }
}

/// Parse a single `"<fieldId> <type> <args...>"` entry.
pub fn parse_column_spec(raw: &str) -> Result<ColumnSpec, SchemaError> {
    let mut tokens = raw.split_whitespace();
    let Some(id_token) = tokens.next() else {
        return Err(SchemaError::malformed(raw, "entry is empty"));
    };
    let field_id = id_token.parse::<FieldId>().map_err(|_| {
        SchemaError::malformed(raw, format!("field id '{id_token}' is not a positive integer"))
    })?;
    let Some(type_token) = tokens.next() else {
        return Err(SchemaError::malformed(raw, "missing field type"));
    };
    let field_type = registry::lookup(type_token)?;
    let Some(strategy) = field_type.strategy else {
        return Err(SchemaError::UnsupportedFieldType {
            type_name: field_type.name.to_string(),
        });
    };
    Ok(ColumnSpec {
        field_id,
        field_type,
        strategy,
        format_args: tokens.map(str::to_string).collect(),
    })
}

/// The set of source columns feeding one destination field.
///
/// Plain fields have exactly one column. Composite fields (addresses) list
/// every participating column, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub field_id: FieldId,
    pub field_type: &'static FieldType,
    pub strategy: PackingStrategy,
    pub columns: Vec<String>,
}

impl FieldGroup {
    pub fn is_composite(&self) -> bool {
        self.strategy.is_composite()
    }
}

/// A validated, immutable mapping from source columns to destination fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    table_id: Option<String>,
    columns: BTreeMap<String, ColumnSpec>,
    groups: BTreeMap<FieldId, FieldGroup>,
}

impl Schema {
    /// Destination table identifier, when the schema source carried one.
    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    #[must_use]
    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnSpec)> {
        self.columns.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Destination fields in field-id order.
    pub fn groups(&self) -> impl Iterator<Item = &FieldGroup> {
        self.groups.values()
    }

    pub fn group(&self, field_id: FieldId) -> Option<&FieldGroup> {
        self.groups.get(&field_id)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Parse every entry of a raw `column -> spec string` mapping.
///
/// All failures are collected; a schema is only returned when every entry is
/// valid and no destination field is targeted twice (composite fields aside).
pub fn parse_schema<I, K, V>(entries: I) -> Result<Schema, SchemaErrors>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut errors = Vec::new();
    let mut columns: BTreeMap<String, ColumnSpec> = BTreeMap::new();

    for (column, raw) in entries {
        let column = column.as_ref();
        if columns.contains_key(column) {
            errors.push(
                SchemaError::malformed(raw.as_ref(), "column is listed more than once")
                    .in_column(column),
            );
            continue;
        }
        match parse_column_spec(raw.as_ref()) {
            Ok(spec) => {
                columns.insert(column.to_string(), spec);
            }
            Err(error) => errors.push(error.in_column(column)),
        }
    }

    let mut by_field: BTreeMap<FieldId, Vec<&str>> = BTreeMap::new();
    for (name, spec) in &columns {
        by_field.entry(spec.field_id).or_default().push(name);
    }

    let mut groups = BTreeMap::new();
    for (field_id, names) in by_field {
        let first = &columns[names[0]];
        let shared = names.len() > 1;
        let composite = names.iter().all(|name| {
            let spec = &columns[*name];
            spec.strategy.is_composite() && spec.field_type == first.field_type
        });
        if shared && !composite {
            errors.push(SchemaError::DuplicateFieldId {
                field_id,
                columns: names.iter().map(|name| (*name).to_string()).collect(),
            });
            continue;
        }
        groups.insert(
            field_id,
            FieldGroup {
                field_id,
                field_type: first.field_type,
                strategy: first.strategy,
                columns: names.iter().map(|name| (*name).to_string()).collect(),
            },
        );
    }

    if !errors.is_empty() {
        return Err(SchemaErrors(errors));
    }
    debug!(
        columns = columns.len(),
        fields = groups.len(),
        "schema parsed"
    );
    Ok(Schema {
        table_id: None,
        columns,
        groups,
    })
}
