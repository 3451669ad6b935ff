//! Date and datetime strategies.
//!
//! Text cells are parsed with a strftime pattern taken from the format
//! arguments. Already-typed date cells skip parsing. Wire values are
//! `YYYY-MM-DD` for dates and `YYYY-MM-DDThh:mm:ssZ` for datetimes.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::cell::CellValue;
use crate::error::{CellError, PackingErrorKind};

pub const DEFAULT_DATE_PATTERN: &str = "%m.%d.%Y";
pub const DEFAULT_DATETIME_PATTERN: &str = "%d%b%Y:%H:%M:%S%.f";

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";
const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(WIRE_DATETIME_FORMAT).to_string()
}

/// Build a pattern from format arguments, falling back to `default`.
///
/// Arguments are rejoined with single spaces, so `%B %d, %Y` survives the
/// whitespace split of the schema entry.
pub(crate) fn pattern_from_args(args: &[String], default: &str) -> Result<String, String> {
    let pattern = if args.is_empty() {
        default.to_string()
    } else {
        args.join(" ")
    };
    if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        return Err(format!("'{pattern}' is not a valid date pattern"));
    }
    Ok(pattern)
}

pub fn pack_date(cell: &CellValue, pattern: &str) -> Result<Option<Value>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }
    let date = match cell {
        CellValue::Date(d) => *d,
        CellValue::DateTime(dt) => dt.date(),
        CellValue::Text(s) => parse_date(s.trim(), pattern)?,
        other => return Err(not_temporal(other, "date")),
    };
    Ok(Some(Value::String(format_date(date))))
}

pub fn pack_datetime(cell: &CellValue, pattern: &str) -> Result<Option<Value>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }
    let datetime = match cell {
        CellValue::DateTime(dt) => *dt,
        CellValue::Date(d) => d.and_time(NaiveTime::MIN),
        CellValue::Text(s) => parse_datetime(s.trim(), pattern)?,
        other => return Err(not_temporal(other, "datetime")),
    };
    Ok(Some(Value::String(format_datetime(datetime))))
}

fn parse_date(text: &str, pattern: &str) -> Result<NaiveDate, CellError> {
    NaiveDate::parse_from_str(text, pattern)
        .or_else(|_| NaiveDateTime::parse_from_str(text, pattern).map(|dt| dt.date()))
        .map_err(|error| mismatch(text, pattern, &error))
}

fn parse_datetime(text: &str, pattern: &str) -> Result<NaiveDateTime, CellError> {
    NaiveDateTime::parse_from_str(text, pattern)
        .or_else(|_| {
            NaiveDate::parse_from_str(text, pattern).map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|error| mismatch(text, pattern, &error))
}

fn mismatch(text: &str, pattern: &str, error: &chrono::ParseError) -> CellError {
    CellError::new(
        PackingErrorKind::DateFormat,
        format!("'{text}' does not match pattern '{pattern}' ({error})"),
    )
}

fn not_temporal(cell: &CellValue, target: &str) -> CellError {
    CellError::value_type(format!(
        "{} value cannot be packed as a {target}",
        cell.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args(pattern: &str) -> Vec<String> {
        pattern.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parses_with_pattern_containing_spaces() {
        let pattern = pattern_from_args(&args("%B %d, %Y"), DEFAULT_DATE_PATTERN).unwrap();
        assert_eq!(pattern, "%B %d, %Y");
        assert_eq!(
            pack_date(&CellValue::text("January 4, 1998"), &pattern).unwrap(),
            Some(json!("1998-01-04"))
        );
    }

    #[test]
    fn default_date_pattern() {
        let pattern = pattern_from_args(&[], DEFAULT_DATE_PATTERN).unwrap();
        assert_eq!(
            pack_date(&CellValue::text("04.15.2021"), &pattern).unwrap(),
            Some(json!("2021-04-15"))
        );
    }

    #[test]
    fn datetime_with_twelve_hour_clock() {
        let pattern =
            pattern_from_args(&args("%B %d %y at %I:%M %p"), DEFAULT_DATETIME_PATTERN).unwrap();
        assert_eq!(
            pack_datetime(&CellValue::text("March 7 89 at 7:00 PM"), &pattern).unwrap(),
            Some(json!("1989-03-07T19:00:00Z"))
        );
    }

    #[test]
    fn datetime_pattern_without_time_is_midnight() {
        assert_eq!(
            pack_datetime(&CellValue::text("2020/02/29"), "%Y/%m/%d").unwrap(),
            Some(json!("2020-02-29T00:00:00Z"))
        );
    }

    #[test]
    fn typed_cells_skip_parsing() {
        let date = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        assert_eq!(
            pack_date(&CellValue::Date(date), "%m/%d/%Y").unwrap(),
            Some(json!("2019-12-31"))
        );
        assert_eq!(
            pack_datetime(&CellValue::Date(date), "%m/%d/%Y").unwrap(),
            Some(json!("2019-12-31T00:00:00Z"))
        );
    }

    #[test]
    fn mismatch_is_date_format_error() {
        let error = pack_date(&CellValue::text("31/12/2019"), "%m/%d/%Y").unwrap_err();
        assert_eq!(error.kind, PackingErrorKind::DateFormat);
        assert!(error.reason.contains("31/12/2019"));
    }

    #[test]
    fn numbers_are_value_type_errors() {
        let error = pack_date(&CellValue::Int(20190101), "%Y%m%d").unwrap_err();
        assert_eq!(error.kind, PackingErrorKind::ValueType);
    }

    #[test]
    fn blank_is_unset() {
        assert_eq!(pack_date(&CellValue::Null, "%Y").unwrap(), None);
        assert_eq!(pack_datetime(&CellValue::text(""), "%Y").unwrap(), None);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(pattern_from_args(&args("%Y-%Q"), DEFAULT_DATE_PATTERN).is_err());
    }
}
