//! Integration tests for the row transformer.

use polars::prelude::{Column, DataFrame};
use qb_model::{FieldId, parse_schema};
use qb_transform::{
    ErrorPolicy, PackingErrorKind, TransformError, TransformOptions, transform,
    transform_with_options,
};
use serde_json::json;

fn fid(value: u32) -> FieldId {
    FieldId::new(value).unwrap()
}

fn contacts() -> DataFrame {
    DataFrame::new(vec![
        Column::new("Name".into(), [Some("Ada"), Some("Grace"), None]),
        Column::new("Age".into(), [Some(36i64), None, Some(52)]),
        Column::new("Joined".into(), [Some("01/15/2020"), Some("2020-02-01"), None]),
        Column::new("Active".into(), [Some("no"), Some("yes"), Some("")]),
        Column::new(
            "Phone".into(),
            [Some("555 123 4567"), Some("123"), Some("(555) 987-6543 x9")],
        ),
    ])
    .unwrap()
}

fn contacts_schema() -> qb_model::Schema {
    parse_schema([
        ("Name", "6 text"),
        ("Age", "7 numeric integer"),
        ("Joined", "8 date %m/%d/%Y"),
        ("Active", "9 checkbox"),
        ("Phone", "10 phone-number (###) ###-#### x####"),
    ])
    .unwrap()
}

#[test]
fn packs_every_row_in_order() {
    let output = transform(&contacts(), &contacts_schema()).unwrap();
    assert_eq!(output.records.len(), 3);
    let rows: Vec<usize> = output.records.iter().map(|record| record.row()).collect();
    assert_eq!(rows, [0, 1, 2]);

    assert_eq!(
        serde_json::to_value(&output.records[0]).unwrap(),
        json!({
            "6": {"value": "Ada"},
            "7": {"value": 36},
            "8": {"value": "2020-01-15"},
            "9": {"value": false},
            "10": {"value": "(555) 123-4567"}
        })
    );
}

#[test]
fn nulls_are_omitted_from_records() {
    let output = transform(&contacts(), &contacts_schema()).unwrap();
    let last = &output.records[2];
    assert!(last.get(fid(6)).is_none());
    assert!(last.get(fid(8)).is_none());
    assert!(last.get(fid(9)).is_none());
    assert_eq!(last.get(fid(7)).unwrap().value, json!(52));
    assert_eq!(last.get(fid(10)).unwrap().value, json!("(555) 987-6543 x9"));
    assert!(last.is_clean());
}

#[test]
fn cell_failures_are_reported_and_marked() {
    let output = transform(&contacts(), &contacts_schema()).unwrap();
    let errors = output.report.errors();
    assert_eq!(errors.len(), 2);

    assert_eq!(errors[0].row, 1);
    assert_eq!(errors[0].column, "Joined");
    assert_eq!(errors[0].kind, PackingErrorKind::DateFormat);
    assert_eq!(errors[0].raw, "2020-02-01");

    assert_eq!(errors[1].row, 1);
    assert_eq!(errors[1].column, "Phone");
    assert_eq!(errors[1].kind, PackingErrorKind::PhoneFormat);

    let record = &output.records[1];
    assert!(record.is_failed(fid(8)));
    assert!(record.is_failed(fid(10)));
    assert_eq!(record.get(fid(6)).unwrap().value, json!("Grace"));
}

#[test]
fn error_policies_select_records() {
    let output = transform(&contacts(), &contacts_schema()).unwrap();

    let error = output.clone().into_sendable(ErrorPolicy::Abort).unwrap_err();
    assert!(matches!(
        error,
        TransformError::UnresolvedPackingErrors { errors: 2, rows: 1 }
    ));

    let skipped = output.clone().into_sendable(ErrorPolicy::SkipRecords).unwrap();
    let rows: Vec<usize> = skipped.iter().map(|record| record.row()).collect();
    assert_eq!(rows, [0, 2]);

    let partial = output.into_sendable(ErrorPolicy::SendPartial).unwrap();
    assert_eq!(partial.len(), 3);
    assert_eq!(
        serde_json::to_value(&partial[1]).unwrap(),
        json!({"6": {"value": "Grace"}, "9": {"value": true}})
    );
}

#[test]
fn clean_output_passes_abort_policy() {
    let df = DataFrame::new(vec![Column::new("Name".into(), ["a", "b"])]).unwrap();
    let schema = parse_schema([("Name", "6 text")]).unwrap();
    let output = transform(&df, &schema).unwrap();
    assert!(output.is_clean());
    assert_eq!(output.into_sendable(ErrorPolicy::Abort).unwrap().len(), 2);
}

#[test]
fn missing_schema_column_is_fatal() {
    let schema = parse_schema([("Name", "6 text"), ("Email", "11 email")]).unwrap();
    let error = transform(&contacts(), &schema).unwrap_err();
    match error {
        TransformError::MissingColumn { columns } => assert_eq!(columns, ["Email"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unmapped_columns_are_ignored_unless_rejected() {
    let schema = parse_schema([("Name", "6 text")]).unwrap();
    let output = transform(&contacts(), &schema).unwrap();
    assert_eq!(output.records[0].len(), 1);

    let options = TransformOptions::new().reject_unmapped_columns(true);
    let error = transform_with_options(&contacts(), &schema, &options).unwrap_err();
    match error {
        TransformError::UnmappedColumns { columns } => {
            assert_eq!(columns, ["Active", "Age", "Joined", "Phone"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_format_args_fail_before_packing() {
    let schema = parse_schema([("Name", "6 text"), ("Active", "9 checkbox yes")]).unwrap();
    let error = transform(&contacts(), &schema).unwrap_err();
    match error {
        TransformError::InvalidFormatArgs {
            column, field_type, ..
        } => {
            assert_eq!(column, "Active");
            assert_eq!(field_type, "checkbox");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn address_columns_combine_into_one_field() {
    let df = DataFrame::new(vec![
        Column::new("Street".into(), [Some("1 Main St"), None]),
        Column::new("Town".into(), [Some("Springfield"), None]),
        Column::new("Zip".into(), [Some(12345i64), None]),
    ])
    .unwrap();
    let schema = parse_schema([
        ("Street", "20 address street1"),
        ("Town", "20 address city"),
        ("Zip", "20 address zip"),
    ])
    .unwrap();

    let output = transform(&df, &schema).unwrap();
    assert!(output.is_clean());
    assert_eq!(
        output.records[0].get(fid(20)).unwrap().value,
        json!({
            "street1": "1 Main St",
            "street2": "",
            "city": "Springfield",
            "state": "",
            "postalCode": "12345",
            "country": ""
        })
    );
    assert_eq!(
        output.records[1].get(fid(20)).unwrap().value,
        json!({
            "street1": "",
            "street2": "",
            "city": "",
            "state": "",
            "postalCode": "",
            "country": ""
        })
    );
}

#[test]
fn every_failing_address_part_is_reported() {
    let df = DataFrame::new(vec![
        Column::new("Street".into(), [true]),
        Column::new("Town".into(), [false]),
        Column::new("Zip".into(), ["12345"]),
    ])
    .unwrap();
    let schema = parse_schema([
        ("Street", "20 address street1"),
        ("Town", "20 address city"),
        ("Zip", "20 address zip"),
    ])
    .unwrap();

    let output = transform(&df, &schema).unwrap();
    let columns: Vec<&str> = output
        .report
        .iter()
        .map(|error| error.column.as_str())
        .collect();
    assert_eq!(columns, ["Street", "Town"]);
    assert!(output.report.iter().all(|error| error.row == 0));
    assert!(output.records[0].is_failed(fid(20)));
    assert!(output.records[0].get(fid(20)).is_none());
}

#[test]
fn repeated_address_part_is_invalid() {
    let df = DataFrame::new(vec![
        Column::new("A".into(), ["x"]),
        Column::new("B".into(), ["y"]),
    ])
    .unwrap();
    let schema = parse_schema([("A", "20 address city"), ("B", "20 address town")]).unwrap();
    assert!(matches!(
        transform(&df, &schema).unwrap_err(),
        TransformError::InvalidFormatArgs { .. }
    ));

    let schema = parse_schema([("A", "20 address city"), ("B", "20 address city")]).unwrap();
    assert!(matches!(
        transform(&df, &schema).unwrap_err(),
        TransformError::InvalidFormatArgs { .. }
    ));
}
