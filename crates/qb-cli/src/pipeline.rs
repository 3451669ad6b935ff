//! The pack pipeline: schema and table in, payload files out.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use qb_ingest::{TableReadOptions, load_schema, read_table_with_options};
use qb_model::{Destination, FieldId};
use qb_output::{BatchLimits, BatchPlan, batch_records, write_payloads};
use qb_transform::{
    ErrorPolicy, ErrorReport, TransformError, TransformOptions, transform_with_options,
};
use tracing::{info, info_span, warn};

/// Everything needed for one pack run.
#[derive(Debug, Clone)]
pub struct PackRequest {
    pub table: PathBuf,
    pub schema: PathBuf,
    /// Overrides the table id carried by the schema file.
    pub table_id: Option<String>,
    pub output_dir: PathBuf,
    pub limits: BatchLimits,
    pub fields_to_return: Option<Vec<FieldId>>,
    pub merge_field_id: Option<FieldId>,
    pub transform: TransformOptions,
    pub policy: ErrorPolicy,
    pub read: TableReadOptions,
    pub dry_run: bool,
}

impl PackRequest {
    pub fn new(table: impl Into<PathBuf>, schema: impl Into<PathBuf>) -> Self {
        let table = table.into();
        let output_dir = table
            .parent()
            .map_or_else(|| PathBuf::from("payloads"), |dir| dir.join("payloads"));
        Self {
            table,
            schema: schema.into(),
            table_id: None,
            output_dir,
            limits: BatchLimits::default(),
            fields_to_return: None,
            merge_field_id: None,
            transform: TransformOptions::default(),
            policy: ErrorPolicy::default(),
            read: TableReadOptions::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug)]
pub struct PackResult {
    pub table_id: String,
    pub rows: usize,
    pub report: ErrorReport,
    pub policy: ErrorPolicy,
    /// Set when packing errors stopped anything from being sent.
    pub blocked: bool,
    pub plan: BatchPlan,
    pub written: Vec<PathBuf>,
}

impl PackResult {
    pub fn records_sent(&self) -> usize {
        self.plan.record_count()
    }

    pub fn has_errors(&self) -> bool {
        self.blocked
    }
}

pub fn run_pack(request: &PackRequest) -> Result<PackResult> {
    let schema = load_schema(&request.schema)?;
    let table_id = request
        .table_id
        .clone()
        .or_else(|| schema.table_id().map(str::to_string))
        .ok_or_else(|| {
            anyhow!(
                "no destination table id: pass --table-id or set _DBID_ in {}",
                request.schema.display()
            )
        })?;

    let span = info_span!("pack", table_id = %table_id);
    let _guard = span.enter();

    let df = read_table_with_options(&request.table, &request.read)?;
    let rows = df.height();
    let output = transform_with_options(&df, &schema, &request.transform)
        .with_context(|| format!("transform {}", request.table.display()))?;
    let report = output.report.clone();

    let records = match output.into_sendable(request.policy) {
        Ok(records) => records,
        Err(error @ TransformError::UnresolvedPackingErrors { .. }) => {
            warn!(%error, "nothing will be sent");
            return Ok(PackResult {
                table_id,
                rows,
                report,
                policy: request.policy,
                blocked: true,
                plan: BatchPlan::default(),
                written: Vec::new(),
            });
        }
        Err(error) => return Err(error.into()),
    };

    let mut destination =
        Destination::new(table_id.clone()).with_merge_field_id(request.merge_field_id);
    if let Some(fields) = &request.fields_to_return {
        destination = destination.with_fields_to_return(fields.clone());
    }
    let plan = batch_records(records, &destination, request.limits)?;

    let written = if request.dry_run {
        info!("dry run, no payload files written");
        Vec::new()
    } else {
        write_payloads(&request.output_dir, &plan)?
    };

    Ok(PackResult {
        table_id,
        rows,
        report,
        policy: request.policy,
        blocked: false,
        plan,
        written,
    })
}
