use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use qb_cli::pipeline::PackResult;
use qb_output::BatchWarning;
use qb_transform::ErrorReport;

/// Longest raw value shown in the error table.
const MAX_RAW_WIDTH: usize = 40;

pub fn print_summary(result: &PackResult) {
    println!("Table: {}", result.table_id);
    println!("Error policy: {}", result.policy);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Records sent"),
        header_cell("Payloads"),
        header_cell("Bytes"),
        header_cell("Packing errors"),
        header_cell("Oversized"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.rows),
        Cell::new(result.records_sent()).add_attribute(Attribute::Bold),
        Cell::new(result.plan.len()),
        Cell::new(result.plan.total_bytes()),
        count_cell(result.report.len(), Color::Red),
        count_cell(result.plan.warnings.len(), Color::Yellow),
    ]);
    println!("{table}");

    print_payload_table(result);
    print_error_table(&result.report);
    print_warnings(&result.plan.warnings);

    if result.blocked {
        eprintln!(
            "error: {} packing error(s) must be corrected before sending \
             (use --on-error skip or partial to send the rest)",
            result.report.len()
        );
    }
}

fn print_payload_table(result: &PackResult) {
    if result.plan.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Payload"),
        header_cell("Records"),
        header_cell("Bytes"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (index, batch) in result.plan.batches.iter().enumerate() {
        let bytes = if batch.oversized {
            Cell::new(batch.bytes)
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(batch.bytes)
        };
        let file = result
            .written
            .get(index)
            .map_or_else(|| dim_cell("-"), |path| Cell::new(path.display()));
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(batch.payload.record_count()),
            bytes,
            file,
        ]);
    }
    println!();
    println!("Payloads:");
    println!("{table}");
}

fn print_error_table(report: &ErrorReport) {
    if report.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Value"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for error in report {
        table.add_row(vec![
            Cell::new(error.row),
            Cell::new(&error.column),
            Cell::new(error.field_id),
            Cell::new(error.kind).fg(Color::Red),
            Cell::new(truncate(&error.raw, MAX_RAW_WIDTH)),
            Cell::new(&error.reason),
        ]);
    }
    println!();
    println!("Packing errors:");
    println!("{table}");

    let counts = report.counts_by_column();
    if counts.len() > 1 {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Column"), header_cell("Errors")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for (column, count) in counts {
            table.add_row(vec![Cell::new(column), count_cell(count, Color::Red)]);
        }
        println!("{table}");
    }
}

fn print_warnings(warnings: &[BatchWarning]) {
    for warning in warnings {
        match warning {
            BatchWarning::OversizedRecord {
                record_index,
                row,
                bytes,
                limit,
            } => eprintln!(
                "warning: record {record_index} (row {row}) needs {bytes} bytes, over the {limit} byte limit"
            ),
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
