//! Packing strategies.
//!
//! A [`Packer`] is a strategy with its format arguments already validated.
//! Compiling a packer checks argument arity and content once per column, so
//! the per-cell path never re-parses arguments.

pub mod address;
pub mod checkbox;
pub mod datetime;
pub mod duration;
pub mod numeric;
pub mod phone;
pub mod text;

use qb_model::PackingStrategy;
use serde_json::Value;

use crate::cell::CellValue;
use crate::error::CellError;

pub use address::AddressPart;
pub use duration::DurationUnit;
pub use numeric::NumericMode;
pub use phone::PhoneMask;

/// A single-column strategy bound to its validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Packer {
    Text,
    Numeric(NumericMode),
    Checkbox,
    Duration(DurationUnit),
    Date { pattern: String },
    DateTime { pattern: String },
    Phone(PhoneMask),
}

impl Packer {
    /// Validate `args` for `strategy`.
    ///
    /// Address columns are packed as a group and have no single-column
    /// packer; use [`AddressPart`] for those.
    pub fn compile(strategy: PackingStrategy, args: &[String]) -> Result<Self, String> {
        match strategy {
            PackingStrategy::Default => no_args(args).map(|()| Packer::Text),
            PackingStrategy::Checkbox => no_args(args).map(|()| Packer::Checkbox),
            PackingStrategy::Numeric => NumericMode::from_args(args).map(Packer::Numeric),
            PackingStrategy::Duration => DurationUnit::from_args(args).map(Packer::Duration),
            PackingStrategy::Date => {
                datetime::pattern_from_args(args, datetime::DEFAULT_DATE_PATTERN)
                    .map(|pattern| Packer::Date { pattern })
            }
            PackingStrategy::DateTime => {
                datetime::pattern_from_args(args, datetime::DEFAULT_DATETIME_PATTERN)
                    .map(|pattern| Packer::DateTime { pattern })
            }
            PackingStrategy::Phone => PhoneMask::from_args(args).map(Packer::Phone),
            PackingStrategy::Address => {
                Err("address columns are packed as a group, not individually".to_string())
            }
        }
    }

    /// Pack one cell. `Ok(None)` means the field is left unset.
    pub fn pack(&self, cell: &CellValue) -> Result<Option<Value>, CellError> {
        match self {
            Packer::Text => text::pack_text(cell),
            Packer::Numeric(mode) => numeric::pack_numeric(cell, *mode),
            Packer::Checkbox => checkbox::pack_checkbox(cell),
            Packer::Duration(unit) => duration::pack_duration(cell, *unit),
            Packer::Date { pattern } => datetime::pack_date(cell, pattern),
            Packer::DateTime { pattern } => datetime::pack_datetime(cell, pattern),
            Packer::Phone(mask) => phone::pack_phone(cell, mask),
        }
    }
}

fn no_args(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "takes no arguments, found {}: {}",
            args.len(),
            args.join(" ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn argument_arity_is_checked_per_strategy() {
        assert!(Packer::compile(PackingStrategy::Default, &args("extra")).is_err());
        assert!(Packer::compile(PackingStrategy::Checkbox, &args("yes no")).is_err());
        assert!(Packer::compile(PackingStrategy::Numeric, &args("integer decimal")).is_err());
        assert!(Packer::compile(PackingStrategy::Phone, &args("###")).is_err());
        assert!(Packer::compile(PackingStrategy::Address, &args("city")).is_err());
    }

    #[test]
    fn compiled_packers_dispatch() {
        let packer = Packer::compile(PackingStrategy::Date, &args("%d/%m/%Y")).unwrap();
        assert_eq!(
            packer,
            Packer::Date {
                pattern: "%d/%m/%Y".to_string()
            }
        );
        assert_eq!(
            packer.pack(&CellValue::text("25/12/2020")).unwrap(),
            Some(json!("2020-12-25"))
        );

        let packer = Packer::compile(PackingStrategy::Duration, &args("seconds")).unwrap();
        assert_eq!(packer.pack(&CellValue::Int(2)).unwrap(), Some(json!(2000)));
    }
}
