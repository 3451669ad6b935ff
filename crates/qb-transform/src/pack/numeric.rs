//! Numeric strategy: numbers and numeric strings become JSON numbers.

use serde_json::{Number, Value};

use crate::cell::CellValue;
use crate::error::CellError;

/// Whether fractional values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMode {
    #[default]
    Decimal,
    Integer,
}

impl NumericMode {
    pub(crate) fn from_args(args: &[String]) -> Result<Self, String> {
        match args {
            [] => Ok(NumericMode::Decimal),
            [mode] => match mode.to_ascii_lowercase().as_str() {
                "decimal" | "float" => Ok(NumericMode::Decimal),
                "integer" | "int" => Ok(NumericMode::Integer),
                other => Err(format!(
                    "unknown numeric mode '{other}', expected 'decimal' or 'integer'"
                )),
            },
            _ => Err(format!("expected at most 1 argument, found {}", args.len())),
        }
    }
}

pub fn pack_numeric(cell: &CellValue, mode: NumericMode) -> Result<Option<Value>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }
    let number = match cell {
        CellValue::Int(v) => return Ok(Some(Value::from(*v))),
        CellValue::Float(v) => *v,
        CellValue::Text(s) => {
            let text = s.trim();
            if let Ok(v) = text.parse::<i64>() {
                return Ok(Some(Value::from(v)));
            }
            parse_float(text)?
        }
        other => {
            return Err(CellError::value_type(format!(
                "{} value cannot be packed as a number",
                other.type_name()
            )));
        }
    };
    float_to_value(number, mode).map(Some)
}

fn parse_float(text: &str) -> Result<f64, CellError> {
    text.parse::<f64>()
        .map_err(|_| CellError::value_type(format!("'{text}' is not a number")))
}

fn float_to_value(value: f64, mode: NumericMode) -> Result<Value, CellError> {
    if !value.is_finite() {
        return Err(CellError::value_type(format!("{value} is not a finite number")));
    }
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        return Ok(Value::from(value as i64));
    }
    if mode == NumericMode::Integer {
        return Err(CellError::value_type(format!("{value} is not an integer")));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| CellError::value_type(format!("{value} is not a finite number")))
}
