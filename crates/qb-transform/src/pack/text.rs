//! Default strategy: values pass through as strings.

use serde_json::Value;

use crate::cell::CellValue;
use crate::error::CellError;

use super::datetime::{format_date, format_datetime};

pub fn pack_text(cell: &CellValue) -> Result<Option<Value>, CellError> {
    let text = match cell {
        CellValue::Null => return Ok(None),
        CellValue::Float(v) if v.is_nan() => return Ok(None),
        CellValue::Text(s) => s.clone(),
        CellValue::Bool(v) => v.to_string(),
        CellValue::Int(v) => v.to_string(),
        CellValue::Float(v) => v.to_string(),
        CellValue::Date(d) => format_date(*d),
        CellValue::DateTime(dt) => format_datetime(*dt),
    };
    Ok(Some(Value::String(text)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strings_pass_through_unchanged() {
        assert_eq!(
            pack_text(&CellValue::text("  spaced  ")).unwrap(),
            Some(json!("  spaced  "))
        );
        assert_eq!(pack_text(&CellValue::text("")).unwrap(), Some(json!("")));
    }

    #[test]
    fn scalars_are_stringified() {
        assert_eq!(pack_text(&CellValue::Int(42)).unwrap(), Some(json!("42")));
        assert_eq!(pack_text(&CellValue::Float(10.0)).unwrap(), Some(json!("10")));
        assert_eq!(pack_text(&CellValue::Float(2.5)).unwrap(), Some(json!("2.5")));
        assert_eq!(pack_text(&CellValue::Bool(false)).unwrap(), Some(json!("false")));
    }

    #[test]
    fn null_is_unset() {
        assert_eq!(pack_text(&CellValue::Null).unwrap(), None);
        assert_eq!(pack_text(&CellValue::Float(f64::NAN)).unwrap(), None);
    }
}
