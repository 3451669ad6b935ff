//! Wire representation of packed records and upload payloads.
//!
//! A payload serializes to
//! `{"to": "<tableId>", "data": [{"<fieldId>": {"value": ...}}], "fieldsToReturn": [...]}`.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::schema::FieldId;

/// One destination field's encoded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedField {
    pub value: Value,
}

impl PackedField {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// One destination record, built from one source row.
///
/// Fields that failed to pack are tracked separately and never serialized;
/// a record with failed fields is not clean and should not be sent as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedRecord {
    row: usize,
    fields: BTreeMap<FieldId, PackedField>,
    failed: BTreeSet<FieldId>,
}

impl PackedRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    /// Index of the source row this record was packed from.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn insert(&mut self, field_id: FieldId, value: impl Into<Value>) {
        self.failed.remove(&field_id);
        self.fields.insert(field_id, PackedField::new(value));
    }

    /// Mark a field as failed. Any value already packed for it is discarded.
    pub fn mark_failed(&mut self, field_id: FieldId) {
        self.fields.remove(&field_id);
        self.failed.insert(field_id);
    }

    pub fn get(&self, field_id: FieldId) -> Option<&PackedField> {
        self.fields.get(&field_id)
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &PackedField)> {
        self.fields.iter().map(|(id, field)| (*id, field))
    }

    pub fn failed_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.failed.iter().copied()
    }

    pub fn is_failed(&self, field_id: FieldId) -> bool {
        self.failed.contains(&field_id)
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for PackedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field_id, field) in &self.fields {
            map.serialize_entry(&field_id.to_string(), field)?;
        }
        map.end()
    }
}

/// Routing information shared by every payload of one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(rename = "to")]
    pub table_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_to_return: Option<Vec<FieldId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_field_id: Option<FieldId>,
}

impl Destination {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            fields_to_return: None,
            merge_field_id: None,
        }
    }

    #[must_use]
    pub fn with_fields_to_return(mut self, fields: Vec<FieldId>) -> Self {
        self.fields_to_return = Some(fields);
        self
    }

    #[must_use]
    pub fn with_merge_field_id(mut self, field_id: Option<FieldId>) -> Self {
        self.merge_field_id = field_id;
        self
    }

    pub fn payload(&self, data: Vec<PackedRecord>) -> Payload {
        Payload {
            to: self.table_id.clone(),
            data,
            fields_to_return: self.fields_to_return.clone(),
            merge_field_id: self.merge_field_id,
        }
    }
}

/// One request body for the record upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub to: String,
    pub data: Vec<PackedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_to_return: Option<Vec<FieldId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_field_id: Option<FieldId>,
}

impl Payload {
    pub fn record_count(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fid(value: u32) -> FieldId {
        FieldId::new(value).unwrap()
    }

    #[test]
    fn record_serializes_with_string_keys_in_field_order() {
        let mut record = PackedRecord::new(0);
        record.insert(fid(10), "b");
        record.insert(fid(6), 42);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"6":{"value":42},"10":{"value":"b"}}"#);
    }

    #[test]
    fn failed_fields_are_not_serialized() {
        let mut record = PackedRecord::new(3);
        record.insert(fid(6), "kept");
        record.insert(fid(7), "dropped");
        record.mark_failed(fid(7));
        assert!(!record.is_clean());
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"6": {"value": "kept"}})
        );
    }

    #[test]
    fn payload_omits_absent_options() {
        let payload = Destination::new("bqx7xre7f").payload(vec![]);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"to":"bqx7xre7f","data":[]}"#
        );

        let payload = Destination::new("bqx7xre7f")
            .with_fields_to_return(vec![fid(3), fid(6)])
            .with_merge_field_id(Some(fid(3)))
            .payload(vec![]);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"to":"bqx7xre7f","data":[],"fieldsToReturn":[3,6],"mergeFieldId":3}"#
        );
    }
}
