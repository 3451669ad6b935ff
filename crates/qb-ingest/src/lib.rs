//! Loading of source tables and schema files.

pub mod schema_file;
pub mod table;

pub use schema_file::{load_schema, load_schema_source};
pub use table::{TableReadOptions, read_table, read_table_with_options};
