//! Greedy batching of packed records under record-count and byte limits.
//!
//! Sizes are exact: a payload's size is the length of its compact JSON
//! serialization, computed as the empty envelope plus each record plus one
//! separator between consecutive records.

use qb_model::{Destination, PackedRecord, Payload};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

/// Most records the upload endpoint accepts per request.
pub const DEFAULT_MAX_RECORDS: usize = 20_000;

/// Request body ceiling, 9 MiB, kept below the endpoint's hard limit.
pub const DEFAULT_MAX_BYTES: usize = 9 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid batch limits: {reason}")]
    InvalidLimits { reason: String },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Upper bounds for a single payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchLimits {
    pub max_records: usize,
    pub max_bytes: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl BatchLimits {
    #[must_use]
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// One payload and its serialized size.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub payload: Payload,
    pub bytes: usize,
    /// Set when the payload holds a single record that alone exceeds the
    /// byte limit.
    pub oversized: bool,
}

/// Advisory problems found while batching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BatchWarning {
    OversizedRecord {
        /// Position of the record in the batcher input.
        record_index: usize,
        /// Source row of the record.
        row: usize,
        bytes: usize,
        limit: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPlan {
    pub batches: Vec<Batch>,
    pub warnings: Vec<BatchWarning>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.payload.record_count()).sum()
    }

    pub fn total_bytes(&self) -> usize {
        self.batches.iter().map(|batch| batch.bytes).sum()
    }

    pub fn payloads(&self) -> impl Iterator<Item = &Payload> {
        self.batches.iter().map(|batch| &batch.payload)
    }
}

/// Split `records` into payloads for `destination`, preserving order.
///
/// Each payload holds at most `max_records` records and at most `max_bytes`
/// bytes, except that a record too large to fit on its own still gets a
/// payload of its own, flagged and reported as a warning.
pub fn batch_records(
    records: Vec<PackedRecord>,
    destination: &Destination,
    limits: BatchLimits,
) -> Result<BatchPlan, BatchError> {
    let span = info_span!("batch", records = records.len(), table = %destination.table_id);
    let _guard = span.enter();

    let envelope = serde_json::to_vec(&destination.payload(Vec::new()))?.len();
    validate_limits(limits, envelope)?;

    let mut plan = BatchPlan::default();
    let mut current: Vec<PackedRecord> = Vec::new();
    let mut current_bytes = envelope;

    for (index, record) in records.into_iter().enumerate() {
        let size = serde_json::to_vec(&record)?.len();
        let separator = usize::from(!current.is_empty());
        let full = current.len() >= limits.max_records
            || current_bytes + separator + size > limits.max_bytes;
        if !current.is_empty() && full {
            plan.batches
                .push(close_batch(destination, &mut current, current_bytes, limits));
            current_bytes = envelope;
        }

        if envelope + size > limits.max_bytes {
            warn!(
                record_index = index,
                row = record.row(),
                bytes = envelope + size,
                limit = limits.max_bytes,
                "record exceeds the payload byte limit on its own"
            );
            plan.warnings.push(BatchWarning::OversizedRecord {
                record_index: index,
                row: record.row(),
                bytes: envelope + size,
                limit: limits.max_bytes,
            });
        }

        current_bytes += usize::from(!current.is_empty()) + size;
        current.push(record);
    }
    if !current.is_empty() {
        plan.batches
            .push(close_batch(destination, &mut current, current_bytes, limits));
    }

    info!(
        payloads = plan.len(),
        bytes = plan.total_bytes(),
        oversized = plan.warnings.len(),
        "batching complete"
    );
    Ok(plan)
}

fn validate_limits(limits: BatchLimits, envelope: usize) -> Result<(), BatchError> {
    if limits.max_records == 0 {
        return Err(BatchError::InvalidLimits {
            reason: "max records must be at least 1".to_string(),
        });
    }
    if limits.max_bytes <= envelope {
        return Err(BatchError::InvalidLimits {
            reason: format!(
                "max bytes {} does not leave room for records in a {envelope} byte envelope",
                limits.max_bytes
            ),
        });
    }
    Ok(())
}

fn close_batch(
    destination: &Destination,
    current: &mut Vec<PackedRecord>,
    bytes: usize,
    limits: BatchLimits,
) -> Batch {
    let data = std::mem::take(current);
    debug!(records = data.len(), bytes, "payload closed");
    Batch {
        oversized: bytes > limits.max_bytes,
        payload: destination.payload(data),
        bytes,
    }
}
