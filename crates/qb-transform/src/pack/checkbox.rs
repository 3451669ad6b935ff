//! Checkbox strategy: loose truthiness.

use serde_json::Value;

use crate::cell::CellValue;
use crate::error::{CellError, PackingErrorKind};

/// Strings (compared case-insensitively, trimmed) that mean false.
pub const FALSE_STRINGS: &[&str] = &["no", "n", "f", "false", "0"];

pub fn pack_checkbox(cell: &CellValue) -> Result<Option<Value>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }
    let checked = match cell {
        CellValue::Bool(v) => *v,
        CellValue::Int(v) => *v != 0,
        CellValue::Float(v) => *v != 0.0,
        CellValue::Text(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            !FALSE_STRINGS.contains(&lowered.as_str())
        }
        other => {
            return Err(CellError::new(
                PackingErrorKind::BooleanParse,
                format!("{} value cannot be read as a checkbox", other.type_name()),
            ));
        }
    };
    Ok(Some(Value::Bool(checked)))
}
