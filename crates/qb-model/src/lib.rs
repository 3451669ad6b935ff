//! Data model for schema-driven record uploads.
//!
//! - **registry**: the static catalog of destination field types
//! - **schema**: column spec parsing and the per-upload [`Schema`]
//! - **source**: raw schema sources as loaded from JSON
//! - **record**: packed records and upload payloads in wire shape

pub mod error;
pub mod record;
pub mod registry;
pub mod schema;
pub mod source;

pub use error::{Result, SchemaError, SchemaErrors};
pub use record::{Destination, PackedField, PackedRecord, Payload};
pub use registry::{FieldType, PackingStrategy, field_types, is_supported, lookup};
pub use schema::{ColumnSpec, FieldGroup, FieldId, Schema, parse_column_spec, parse_schema};
pub use source::{SchemaSource, TABLE_ID_KEY};
