//! Field packing for record uploads.
//!
//! Turns rows of a polars [`DataFrame`](polars::prelude::DataFrame) into
//! [`PackedRecord`](qb_model::PackedRecord)s according to a
//! [`Schema`](qb_model::Schema). Each column's field type selects a packing
//! strategy; format arguments from the schema entry configure it.

pub mod cell;
pub mod error;
pub mod options;
pub mod pack;
pub mod report;
pub mod transformer;

pub use cell::CellValue;
pub use error::{CellError, PackingError, PackingErrorKind, Result, TransformError};
pub use options::{ErrorPolicy, TransformOptions};
pub use pack::{AddressPart, DurationUnit, NumericMode, Packer, PhoneMask};
pub use report::ErrorReport;
pub use transformer::{CompiledSchema, TransformOutput, transform, transform_with_options};
