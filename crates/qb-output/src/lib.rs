//! Upload payload batching and output.

pub mod batcher;
pub mod write;

pub use batcher::{
    Batch, BatchError, BatchLimits, BatchPlan, BatchWarning, DEFAULT_MAX_BYTES,
    DEFAULT_MAX_RECORDS, batch_records,
};
pub use write::{payload_file_name, write_payloads};
