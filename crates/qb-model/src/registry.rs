//! Catalog of destination field types.
//!
//! Every column in a schema names one of these types. A type is bound to the
//! [`PackingStrategy`] that turns source cells into wire values; types the
//! record API cannot accept through a plain upload carry no strategy and are
//! rejected when a schema is parsed.

use std::fmt;

use serde::Serialize;

use crate::error::SchemaError;

/// How cells of a field type are converted into wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackingStrategy {
    /// Pass the value through, stringifying non-text scalars.
    Default,
    /// Numbers or numeric strings, emitted as JSON numbers.
    Numeric,
    /// Boolean normalization.
    Checkbox,
    /// Durations in milliseconds.
    Duration,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Timestamp, `YYYY-MM-DDThh:mm:ssZ`.
    DateTime,
    /// Phone number rendered through a `#` mask.
    Phone,
    /// Composite street address fed by several sibling columns.
    Address,
}

impl PackingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackingStrategy::Default => "default",
            PackingStrategy::Numeric => "numeric",
            PackingStrategy::Checkbox => "checkbox",
            PackingStrategy::Duration => "duration",
            PackingStrategy::Date => "date",
            PackingStrategy::DateTime => "datetime",
            PackingStrategy::Phone => "phone",
            PackingStrategy::Address => "address",
        }
    }

    /// Returns true when one destination field is fed by several columns.
    pub fn is_composite(&self) -> bool {
        matches!(self, PackingStrategy::Address)
    }
}

impl fmt::Display for PackingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destination field type and the strategy used to pack it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldType {
    /// Canonical type name as written in schema entries.
    pub name: &'static str,
    /// `None` marks a type that cannot be uploaded.
    pub strategy: Option<PackingStrategy>,
    pub description: &'static str,
}

impl FieldType {
    pub fn is_supported(&self) -> bool {
        self.strategy.is_some()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const fn supported(
    name: &'static str,
    strategy: PackingStrategy,
    description: &'static str,
) -> FieldType {
    FieldType {
        name,
        strategy: Some(strategy),
        description,
    }
}

const fn unsupported(name: &'static str, description: &'static str) -> FieldType {
    FieldType {
        name,
        strategy: None,
        description,
    }
}

static FIELD_TYPES: &[FieldType] = &[
    supported("text", PackingStrategy::Default, "string of text"),
    supported("rich-text", PackingStrategy::Default, "html text"),
    supported(
        "multi-line-text",
        PackingStrategy::Default,
        "text with newline support",
    ),
    supported(
        "multiple-choice-text",
        PackingStrategy::Default,
        "string naming the selected option",
    ),
    supported(
        "email-address",
        PackingStrategy::Default,
        "email address as a string",
    ),
    supported("url", PackingStrategy::Default, "url as a string"),
    supported(
        "record-id",
        PackingStrategy::Numeric,
        "integer record id, the default merge field",
    ),
    supported("numeric", PackingStrategy::Numeric, "integer or decimal"),
    supported(
        "numeric-percent",
        PackingStrategy::Numeric,
        "decimal from zero to one inclusive",
    ),
    supported(
        "numeric-rating",
        PackingStrategy::Numeric,
        "integer from one to five",
    ),
    supported(
        "numeric-currency",
        PackingStrategy::Numeric,
        "decimal amount of currency",
    ),
    supported(
        "duration",
        PackingStrategy::Duration,
        "number of milliseconds, or seconds with the `seconds` argument",
    ),
    supported(
        "date",
        PackingStrategy::Date,
        "date value or string; arguments give the parse pattern, e.g. %m/%d/%Y",
    ),
    supported(
        "datetime",
        PackingStrategy::DateTime,
        "datetime value or string; arguments give the parse pattern",
    ),
    supported(
        "checkbox",
        PackingStrategy::Checkbox,
        "boolean; no/n/f/false/0 are false, anything else non-null is true",
    ),
    supported(
        "phone-number",
        PackingStrategy::Phone,
        "phone number; arguments give a # mask, e.g. (###) ###-#### x####",
    ),
    supported(
        "address",
        PackingStrategy::Address,
        "composite; one column per part (street1, street2, city, state, postal-code, country)",
    ),
    unsupported("multi-select", "list of strings, not supported"),
    unsupported("time-of-day", "time of day, not supported"),
    unsupported("user", "user reference, not supported"),
    unsupported("list-user", "list of user references, not supported"),
    unsupported("file-attachment", "not supported"),
    unsupported("lookup", "not supported"),
    unsupported("summary", "not supported"),
];

/// Names used by the remote field metadata that differ from catalog names.
const ALIASES: &[(&str, &str)] = &[
    ("phone", "phone-number"),
    ("email", "email-address"),
    ("timestamp", "datetime"),
    ("recordid", "record-id"),
];

/// All known field types, in catalog order.
pub fn field_types() -> &'static [FieldType] {
    FIELD_TYPES
}

/// Resolve a type name (case-insensitive, aliases allowed).
pub fn lookup(type_name: &str) -> Result<&'static FieldType, SchemaError> {
    let normalized = type_name.trim().to_ascii_lowercase();
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map_or(normalized.as_str(), |(_, name)| *name);
    FIELD_TYPES
        .iter()
        .find(|field_type| field_type.name == canonical)
        .ok_or_else(|| SchemaError::UnknownFieldType {
            type_name: type_name.to_string(),
        })
}

/// Returns true when the type exists and can be packed.
pub fn is_supported(type_name: &str) -> bool {
    lookup(type_name).is_ok_and(FieldType::is_supported)
}
