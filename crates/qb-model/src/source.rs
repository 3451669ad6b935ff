//! Raw schema sources.
//!
//! A schema source is a JSON object mapping column names to entries. An entry
//! is either a spec string (`"8 date %m/%d/%Y"`) or an object
//! (`{"id": 8, "type": "date", "args": ["%m/%d/%Y"]}`). The reserved key
//! `_DBID_` carries the destination table id.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaErrors};
use crate::schema::{Schema, parse_schema};

/// Key holding the destination table id in a schema source.
pub const TABLE_ID_KEY: &str = "_DBID_";

/// Unparsed schema: column name to spec string, plus an optional table id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSource {
    pub table_id: Option<String>,
    pub entries: BTreeMap<String, String>,
}

impl SchemaSource {
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text).map_err(|error| SchemaError::InvalidSource {
            message: error.to_string(),
        })?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, SchemaError> {
        let Value::Object(object) = value else {
            return Err(SchemaError::InvalidSource {
                message: "expected a JSON object of column entries".to_string(),
            });
        };
        let mut source = SchemaSource::default();
        for (key, entry) in object {
            if key == TABLE_ID_KEY {
                let Value::String(table_id) = entry else {
                    return Err(SchemaError::InvalidSource {
                        message: format!("{TABLE_ID_KEY} must be a string"),
                    });
                };
                source.table_id = Some(table_id.clone());
                continue;
            }
            let spec = entry_to_spec(entry).map_err(|message| {
                SchemaError::InvalidSource {
                    message: format!("column '{key}': {message}"),
                }
            })?;
            source.entries.insert(key.clone(), spec);
        }
        Ok(source)
    }

    /// Parse every entry into a [`Schema`], carrying the table id along.
    pub fn parse(&self) -> Result<Schema, SchemaErrors> {
        let schema = parse_schema(&self.entries)?;
        Ok(match &self.table_id {
            Some(table_id) => schema.with_table_id(table_id.clone()),
            None => schema,
        })
    }
}

fn entry_to_spec(entry: &Value) -> Result<String, String> {
    match entry {
        Value::String(spec) => Ok(spec.clone()),
        Value::Object(object) => object_to_spec(object),
        other => Err(format!("expected a spec string or object, found {other}")),
    }
}

fn object_to_spec(object: &Map<String, Value>) -> Result<String, String> {
    let id = match object.get("id") {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id.clone(),
        _ => return Err("missing numeric 'id'".to_string()),
    };
    let Some(Value::String(field_type)) = object.get("type") else {
        return Err("missing string 'type'".to_string());
    };
    let mut spec = format!("{id} {field_type}");
    match object.get("args") {
        None | Some(Value::Null) => {}
        Some(Value::String(arg)) => push_arg(&mut spec, arg),
        Some(Value::Array(args)) => {
            for arg in args {
                push_arg(&mut spec, &scalar_arg(arg)?);
            }
        }
        Some(Value::Object(args)) => {
            for arg in args.values() {
                push_arg(&mut spec, &scalar_arg(arg)?);
            }
        }
        Some(other) => return Err(format!("unsupported 'args' value {other}")),
    }
    Ok(spec)
}

fn scalar_arg(value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!("argument {other} is not a scalar")),
    }
}

fn push_arg(spec: &mut String, arg: &str) {
    if !arg.trim().is_empty() {
        spec.push(' ');
        spec.push_str(arg.trim());
    }
}
