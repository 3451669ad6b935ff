//! Integration tests for payload batching and writing.

use qb_model::{Destination, FieldId, PackedRecord};
use qb_output::{BatchLimits, BatchWarning, batch_records, write_payloads};

fn fid(value: u32) -> FieldId {
    FieldId::new(value).unwrap()
}

fn record(row: usize, text: &str) -> PackedRecord {
    let mut record = PackedRecord::new(row);
    record.insert(fid(6), text);
    record
}

fn size_of<T: serde::Serialize>(value: &T) -> usize {
    serde_json::to_vec(value).unwrap().len()
}

#[test]
fn payload_sizes_are_exact() {
    let destination = Destination::new("bqx7xre7f").with_fields_to_return(vec![fid(3)]);
    let records: Vec<PackedRecord> = (0..7).map(|row| record(row, "some text")).collect();
    let plan = batch_records(records, &destination, BatchLimits::default()).unwrap();
    assert_eq!(plan.len(), 1);
    for batch in &plan.batches {
        assert_eq!(batch.bytes, size_of(&batch.payload));
    }
}

#[test]
fn byte_limit_counts_envelope_and_separators() {
    let destination = Destination::new("t");
    let envelope = size_of(&destination.payload(Vec::new()));
    let one = size_of(&record(0, "abcd"));

    // Room for two records and their separator, not for a third.
    let limits = BatchLimits::default().with_max_bytes(envelope + 2 * one + 1);
    let records = (0..3).map(|row| record(row, "abcd")).collect();
    let plan = batch_records(records, &destination, limits).unwrap();

    let counts: Vec<usize> = plan
        .payloads()
        .map(qb_model::Payload::record_count)
        .collect();
    assert_eq!(counts, [2, 1]);
    assert!(plan.batches.iter().all(|batch| batch.bytes <= limits.max_bytes));
    assert!(plan.warnings.is_empty());

    // One byte less and the separator no longer fits.
    let limits = BatchLimits::default().with_max_bytes(envelope + 2 * one);
    let records = (0..3).map(|row| record(row, "abcd")).collect();
    let plan = batch_records(records, &destination, limits).unwrap();
    assert_eq!(plan.len(), 3);
}

#[test]
fn order_is_preserved_across_payloads() {
    let records = (0..10).map(|row| record(row, "x")).collect();
    let limits = BatchLimits::default().with_max_records(3);
    let plan = batch_records(records, &Destination::new("t"), limits).unwrap();
    let rows: Vec<usize> = plan
        .payloads()
        .flat_map(|payload| payload.data.iter().map(PackedRecord::row))
        .collect();
    assert_eq!(rows, (0..10).collect::<Vec<_>>());
    assert_eq!(plan.record_count(), 10);
}

#[test]
fn oversized_record_gets_its_own_flagged_payload() {
    let destination = Destination::new("t");
    let envelope = size_of(&destination.payload(Vec::new()));
    let small = size_of(&record(0, "a"));
    let limits = BatchLimits::default().with_max_bytes(envelope + 3 * small);

    let records = vec![
        record(0, "a"),
        record(1, &"z".repeat(200)),
        record(2, "a"),
    ];
    let plan = batch_records(records, &destination, limits).unwrap();

    assert_eq!(plan.len(), 3);
    assert!(!plan.batches[0].oversized);
    assert!(plan.batches[1].oversized);
    assert!(!plan.batches[2].oversized);
    assert_eq!(plan.batches[1].payload.data[0].row(), 1);
    assert!(matches!(
        plan.warnings.as_slice(),
        [BatchWarning::OversizedRecord { record_index: 1, row: 1, .. }]
    ));
}

#[test]
fn payload_wire_shape() {
    let mut first = PackedRecord::new(0);
    first.insert(fid(6), "Ada");
    first.insert(fid(7), 36);
    let destination = Destination::new("bqx7xre7f").with_merge_field_id(Some(fid(3)));
    let plan = batch_records(vec![first], &destination, BatchLimits::default()).unwrap();

    insta::assert_snapshot!(serde_json::to_string_pretty(&plan.batches[0].payload).unwrap(), @r#"
    {
      "to": "bqx7xre7f",
      "data": [
        {
          "6": {
            "value": "Ada"
          },
          "7": {
            "value": 36
          }
        }
      ],
      "mergeFieldId": 3
    }
    "#);
}

#[test]
fn writes_one_file_per_payload() {
    let dir = tempfile::tempdir().unwrap();
    let records = (0..5).map(|row| record(row, "x")).collect();
    let limits = BatchLimits::default().with_max_records(2);
    let plan = batch_records(records, &Destination::new("t"), limits).unwrap();

    let paths = write_payloads(&dir.path().join("out"), &plan).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["payload-0001.json", "payload-0002.json", "payload-0003.json"]
    );

    let written = std::fs::read(&paths[0]).unwrap();
    assert_eq!(written.len(), plan.batches[0].bytes);
    let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(value["data"].as_array().unwrap().len(), 2);
}
