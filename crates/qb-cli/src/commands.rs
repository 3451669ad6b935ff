use anyhow::{Context, Result};
use comfy_table::Table;
use qb_cli::pipeline::{PackRequest, PackResult, run_pack};
use qb_ingest::{TableReadOptions, load_schema};
use qb_output::BatchLimits;
use qb_transform::{CompiledSchema, TransformOptions};

use crate::cli::{CheckArgs, PackArgs};
use crate::summary::apply_table_style;

pub fn run_types() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Type", "Strategy", "Description"]);
    apply_table_style(&mut table);
    for field_type in qb_model::field_types() {
        let strategy = field_type
            .strategy
            .map_or_else(|| "unsupported".to_string(), |strategy| strategy.to_string());
        table.add_row(vec![
            field_type.name.to_string(),
            strategy,
            field_type.description.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let compiled = CompiledSchema::compile(&schema)
        .with_context(|| format!("invalid format arguments in {}", args.schema.display()))?;

    if let Some(table_id) = schema.table_id() {
        println!("Table: {table_id}");
    }
    let mut table = Table::new();
    table.set_header(vec!["Column", "Field", "Type", "Strategy", "Arguments"]);
    apply_table_style(&mut table);
    for (column, spec) in schema.columns() {
        table.add_row(vec![
            column.to_string(),
            spec.field_id().to_string(),
            spec.field_type().name.to_string(),
            spec.strategy().to_string(),
            spec.format_args().join(" "),
        ]);
    }
    println!("{table}");
    println!(
        "{} column(s) feeding {} field(s)",
        schema.len(),
        compiled.len()
    );
    Ok(())
}

pub fn run_pack_command(args: &PackArgs) -> Result<PackResult> {
    let mut request = PackRequest::new(&args.table, &args.schema);
    request.table_id.clone_from(&args.table_id);
    if let Some(dir) = &args.output_dir {
        request.output_dir.clone_from(dir);
    }
    request.limits = BatchLimits::default()
        .with_max_records(args.max_records)
        .with_max_bytes(args.max_bytes);
    request.fields_to_return.clone_from(&args.fields_to_return);
    request.merge_field_id = args.merge_field_id;
    request.transform = TransformOptions::new().reject_unmapped_columns(args.reject_unmapped);
    request.policy = args.on_error.into();
    request.read = TableReadOptions::default().with_infer_types(!args.all_text);
    request.dry_run = args.dry_run;
    run_pack(&request)
}
