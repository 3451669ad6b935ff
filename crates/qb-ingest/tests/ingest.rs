//! Integration tests for table and schema loading.

use std::fs;

use polars::prelude::DataType;
use qb_ingest::{
    TableReadOptions, load_schema, load_schema_source, read_table, read_table_with_options,
};

#[test]
fn reads_csv_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    fs::write(&path, "Name,Age,Zip\nAda,36,02134\nGrace,,10001\n").unwrap();

    let df = read_table(&path).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 3);
    assert_eq!(df.column("Age").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("Age").unwrap().null_count(), 1);
}

#[test]
fn text_mode_keeps_leading_zeros() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    fs::write(&path, "Name,Zip\nAda,02134\n").unwrap();

    let options = TableReadOptions::default().with_infer_types(false);
    let df = read_table_with_options(&path, &options).unwrap();
    let zip = df.column("Zip").unwrap();
    assert_eq!(zip.dtype(), &DataType::String);
    assert_eq!(zip.str().unwrap().get(0), Some("02134"));
}

#[test]
fn missing_table_reports_path() {
    let error = read_table(std::path::Path::new("/nonexistent/table.csv")).unwrap_err();
    assert!(format!("{error:#}").contains("/nonexistent/table.csv"));
}

#[test]
fn loads_schema_file_with_table_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{"_DBID_": "bqx7xre7f", "Name": "6 text", "Joined": "8 date %m/%d/%Y"}"#,
    )
    .unwrap();

    let source = load_schema_source(&path).unwrap();
    assert_eq!(source.entries.len(), 2);

    let schema = load_schema(&path).unwrap();
    assert_eq!(schema.table_id(), Some("bqx7xre7f"));
    assert_eq!(schema.column("Joined").unwrap().format_args(), ["%m/%d/%Y"]);
}

#[test]
fn invalid_schema_lists_every_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(&path, r#"{"A": "0 text", "B": "7 warp-drive"}"#).unwrap();

    let error = load_schema(&path).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("schema has 2 error(s)"), "{message}");
}
