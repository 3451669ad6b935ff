//! Row transformer: applies a schema to every row of a table.
//!
//! The schema is compiled first, which validates every column's format
//! arguments. Structural problems (invalid arguments, schema columns missing
//! from the table) fail the whole transform before any row is packed.
//! Per-cell failures are collected into an [`ErrorReport`] instead, and the
//! affected fields are marked failed on their records.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame};
use qb_model::{ColumnSpec, FieldId, PackedRecord, Schema};
use tracing::{debug, info, info_span, warn};

use crate::cell::CellValue;
use crate::error::{CellError, PackingError, Result, TransformError};
use crate::options::{ErrorPolicy, TransformOptions};
use crate::pack::address::{assemble_address, pack_address_part};
use crate::pack::{AddressPart, Packer};
use crate::report::ErrorReport;

#[derive(Debug, Clone, PartialEq)]
enum FieldPlan {
    Single { column: String, packer: Packer },
    Address { parts: Vec<(AddressPart, String)> },
}

#[derive(Debug, Clone, PartialEq)]
struct CompiledField {
    field_id: FieldId,
    plan: FieldPlan,
}

/// A schema whose format arguments have all been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    fields: Vec<CompiledField>,
}

impl CompiledSchema {
    pub fn compile(schema: &Schema) -> Result<Self> {
        let mut fields = Vec::new();
        for group in schema.groups() {
            let plan = if group.is_composite() {
                compile_address(schema, &group.columns)?
            } else {
                let Some((column, spec)) = group
                    .columns
                    .first()
                    .and_then(|name| schema.column(name).map(|spec| (name, spec)))
                else {
                    continue;
                };
                let packer = Packer::compile(spec.strategy(), spec.format_args())
                    .map_err(|reason| invalid_args(column, spec, reason))?;
                FieldPlan::Single {
                    column: column.clone(),
                    packer,
                }
            };
            fields.push(CompiledField {
                field_id: group.field_id,
                plan,
            });
        }
        Ok(Self { fields })
    }

    /// Number of destination fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn compile_address(schema: &Schema, columns: &[String]) -> Result<FieldPlan> {
    let mut parts: Vec<(AddressPart, String)> = Vec::with_capacity(columns.len());
    for column in columns {
        let Some(spec) = schema.column(column) else {
            continue;
        };
        let part = AddressPart::from_args(spec.format_args())
            .map_err(|reason| invalid_args(column, spec, reason))?;
        if let Some((_, other)) = parts.iter().find(|(existing, _)| *existing == part) {
            return Err(invalid_args(
                column,
                spec,
                format!("address part '{part}' is already supplied by column '{other}'"),
            ));
        }
        parts.push((part, column.clone()));
    }
    Ok(FieldPlan::Address { parts })
}

fn invalid_args(column: &str, spec: &ColumnSpec, reason: String) -> TransformError {
    TransformError::InvalidFormatArgs {
        column: column.to_string(),
        field_type: spec.field_type().name.to_string(),
        reason,
    }
}

/// Packed records plus every per-cell failure.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub records: Vec<PackedRecord>,
    pub report: ErrorReport,
}

impl TransformOutput {
    pub fn is_clean(&self) -> bool {
        self.report.is_empty()
    }

    /// Records that may be sent under `policy`.
    ///
    /// Failed fields are never serialized, so under
    /// [`ErrorPolicy::SendPartial`] the rest of each record still goes out.
    pub fn into_sendable(self, policy: ErrorPolicy) -> Result<Vec<PackedRecord>> {
        let total = self.records.len();
        let records: Vec<PackedRecord> = match policy {
            ErrorPolicy::Abort => {
                if !self.report.is_empty() {
                    return Err(TransformError::UnresolvedPackingErrors {
                        errors: self.report.len(),
                        rows: self.report.affected_rows().len(),
                    });
                }
                self.records
            }
            ErrorPolicy::SkipRecords => self
                .records
                .into_iter()
                .filter(PackedRecord::is_clean)
                .collect(),
            ErrorPolicy::SendPartial => self.records,
        };
        info!(
            policy = %policy,
            sendable = records.len(),
            skipped = total - records.len(),
            "records selected for sending"
        );
        Ok(records)
    }
}

/// Pack every row of `df` with default options.
pub fn transform(df: &DataFrame, schema: &Schema) -> Result<TransformOutput> {
    transform_with_options(df, schema, &TransformOptions::default())
}

pub fn transform_with_options(
    df: &DataFrame,
    schema: &Schema,
    options: &TransformOptions,
) -> Result<TransformOutput> {
    let span = info_span!("transform", rows = df.height(), columns = schema.len());
    let _guard = span.enter();

    let compiled = CompiledSchema::compile(schema)?;
    check_columns(df, schema, options)?;
    let bound = compiled
        .fields
        .iter()
        .map(|field| BoundField::bind(field, df))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    let mut report = ErrorReport::default();
    for row in 0..df.height() {
        let mut record = PackedRecord::new(row);
        for field in &bound {
            field.pack_into(row, &mut record, &mut report)?;
        }
        records.push(record);
    }

    if report.is_empty() {
        info!(records = records.len(), "transform complete");
    } else {
        warn!(
            records = records.len(),
            errors = report.len(),
            rows = report.affected_rows().len(),
            "transform complete with packing errors"
        );
    }
    Ok(TransformOutput { records, report })
}

fn check_columns(df: &DataFrame, schema: &Schema, options: &TransformOptions) -> Result<()> {
    let names = df.get_column_names_owned();
    let table_columns: BTreeSet<&str> = names.iter().map(|name| name.as_str()).collect();

    let missing: Vec<String> = schema
        .columns()
        .map(|(name, _)| name)
        .filter(|name| !table_columns.contains(name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumn { columns: missing });
    }

    let unmapped: Vec<String> = table_columns
        .iter()
        .filter(|name| schema.column(name).is_none())
        .map(|name| (*name).to_string())
        .collect();
    if unmapped.is_empty() {
        return Ok(());
    }
    if options.reject_unmapped_columns {
        return Err(TransformError::UnmappedColumns { columns: unmapped });
    }
    debug!(columns = ?unmapped, "ignoring unmapped table columns");
    Ok(())
}

enum BoundField<'a> {
    Single {
        field_id: FieldId,
        name: &'a str,
        column: &'a Column,
        packer: &'a Packer,
    },
    Address {
        field_id: FieldId,
        parts: Vec<(AddressPart, &'a str, &'a Column)>,
    },
}

impl<'a> BoundField<'a> {
    fn bind(field: &'a CompiledField, df: &'a DataFrame) -> Result<Self> {
        Ok(match &field.plan {
            FieldPlan::Single { column, packer } => BoundField::Single {
                field_id: field.field_id,
                name: column,
                column: df.column(column)?,
                packer,
            },
            FieldPlan::Address { parts } => BoundField::Address {
                field_id: field.field_id,
                parts: parts
                    .iter()
                    .map(|(part, name)| Ok((*part, name.as_str(), df.column(name)?)))
                    .collect::<Result<Vec<_>>>()?,
            },
        })
    }

    fn pack_into(
        &self,
        row: usize,
        record: &mut PackedRecord,
        report: &mut ErrorReport,
    ) -> Result<()> {
        match self {
            BoundField::Single {
                field_id,
                name,
                column,
                packer,
            } => {
                let cell = CellValue::from(column.get(row)?);
                match packer.pack(&cell) {
                    Ok(Some(value)) => record.insert(*field_id, value),
                    Ok(None) => {}
                    Err(error) => {
                        record.mark_failed(*field_id);
                        report.push(locate(error, row, name, *field_id, &cell));
                    }
                }
            }
            BoundField::Address { field_id, parts } => {
                let mut values: [String; 6] = Default::default();
                let mut failed = false;
                for (part, name, column) in parts {
                    let cell = CellValue::from(column.get(row)?);
                    match pack_address_part(&cell) {
                        Ok(value) => values[part.index()] = value,
                        Err(error) => {
                            failed = true;
                            report.push(locate(error, row, name, *field_id, &cell));
                        }
                    }
                }
                if failed {
                    record.mark_failed(*field_id);
                } else {
                    record.insert(*field_id, assemble_address(&values));
                }
            }
        }
        Ok(())
    }
}

fn locate(
    error: CellError,
    row: usize,
    column: &str,
    field_id: FieldId,
    cell: &CellValue,
) -> PackingError {
    PackingError {
        row,
        column: column.to_string(),
        field_id,
        raw: cell.to_string(),
        kind: error.kind,
        reason: error.reason,
    }
}
