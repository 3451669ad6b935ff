//! Duration strategy: whole milliseconds.

use serde_json::Value;

use crate::cell::CellValue;
use crate::error::CellError;

/// Unit of the source values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl DurationUnit {
    pub(crate) fn from_args(args: &[String]) -> Result<Self, String> {
        match args {
            [] => Ok(DurationUnit::Milliseconds),
            [unit] => match unit.to_ascii_lowercase().as_str() {
                "milliseconds" | "ms" => Ok(DurationUnit::Milliseconds),
                "seconds" | "s" => Ok(DurationUnit::Seconds),
                other => Err(format!(
                    "unknown duration unit '{other}', expected 'milliseconds' or 'seconds'"
                )),
            },
            _ => Err(format!("expected at most 1 argument, found {}", args.len())),
        }
    }

    fn factor(self) -> f64 {
        match self {
            DurationUnit::Milliseconds => 1.0,
            DurationUnit::Seconds => 1000.0,
        }
    }
}

pub fn pack_duration(cell: &CellValue, unit: DurationUnit) -> Result<Option<Value>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }
    let amount = match cell {
        CellValue::Int(v) => {
            let millis = match unit {
                DurationUnit::Milliseconds => Some(*v),
                DurationUnit::Seconds => v.checked_mul(1000),
            };
            return millis
                .map(|ms| Some(Value::from(ms)))
                .ok_or_else(|| CellError::value_type(format!("duration {v} is out of range")));
        }
        CellValue::Float(v) => *v,
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CellError::value_type(format!("'{}' is not a duration", s.trim())))?,
        other => {
            return Err(CellError::value_type(format!(
                "{} value cannot be packed as a duration",
                other.type_name()
            )));
        }
    };
    let millis = (amount * unit.factor()).trunc();
    if !millis.is_finite() || millis.abs() >= 9.0e18 {
        return Err(CellError::value_type(format!("duration {amount} is out of range")));
    }
    Ok(Some(Value::from(millis as i64)))
}
