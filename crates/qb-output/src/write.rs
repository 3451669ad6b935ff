//! Writing payloads to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::batcher::BatchPlan;

/// File name of the payload at `index` (zero-based).
pub fn payload_file_name(index: usize) -> String {
    format!("payload-{:04}.json", index + 1)
}

/// Write every payload of `plan` into `output_dir` as compact JSON, one file
/// per payload, and return the written paths in order.
pub fn write_payloads(output_dir: &Path, plan: &BatchPlan) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;

    let mut outputs = Vec::with_capacity(plan.len());
    for (index, batch) in plan.batches.iter().enumerate() {
        let path = output_dir.join(payload_file_name(index));
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &batch.payload)
            .with_context(|| format!("write payload {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flush {}", path.display()))?;
        outputs.push(path);
    }
    info!(
        files = outputs.len(),
        dir = %output_dir.display(),
        "payloads written"
    );
    Ok(outputs)
}
