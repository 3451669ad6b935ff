//! Phone strategy: digits rendered through a `#` mask.
//!
//! Each `#` in the mask takes the next digit of the value. Literal mask
//! characters are only written once a following digit exists, so an unused
//! extension suffix is dropped entirely.

use std::fmt;

use serde_json::Value;

use crate::cell::CellValue;
use crate::error::{CellError, PackingErrorKind};

pub const DEFAULT_PHONE_MASK: &str = "(###) ###-#### x##########";

/// Digits every phone number must carry.
pub const MIN_PHONE_DIGITS: usize = 10;

const DIGIT_SLOT: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneMask {
    template: String,
    slots: usize,
}

impl PhoneMask {
    pub fn parse(template: &str) -> Result<Self, String> {
        let slots = template.chars().filter(|ch| *ch == DIGIT_SLOT).count();
        if slots < MIN_PHONE_DIGITS {
            return Err(format!(
                "mask '{template}' has {slots} digit slot(s), at least {MIN_PHONE_DIGITS} required"
            ));
        }
        Ok(Self {
            template: template.to_string(),
            slots,
        })
    }

    pub(crate) fn from_args(args: &[String]) -> Result<Self, String> {
        if args.is_empty() {
            Self::parse(DEFAULT_PHONE_MASK)
        } else {
            Self::parse(&args.join(" "))
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn render(&self, digits: &str) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut pending = String::new();
        let mut digits = digits.chars();
        for ch in self.template.chars() {
            if ch != DIGIT_SLOT {
                pending.push(ch);
                continue;
            }
            let Some(digit) = digits.next() else {
                break;
            };
            rendered.push_str(&pending);
            pending.clear();
            rendered.push(digit);
        }
        rendered
    }
}

impl fmt::Display for PhoneMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

pub fn pack_phone(cell: &CellValue, mask: &PhoneMask) -> Result<Option<Value>, CellError> {
    if cell.is_blank() {
        return Ok(None);
    }
    let digits = match cell {
        CellValue::Int(v) if *v >= 0 => v.to_string(),
        CellValue::Float(v) if v.is_finite() && *v >= 0.0 => format!("{:.0}", v.trunc()),
        CellValue::Int(_) | CellValue::Float(_) => {
            return Err(phone_error(format!("{cell} is not a valid phone number")));
        }
        CellValue::Text(s) => extract_digits(s)?,
        other => {
            return Err(CellError::value_type(format!(
                "{} value '{other}' cannot be packed as a phone number",
                other.type_name()
            )));
        }
    };
    if digits.len() < MIN_PHONE_DIGITS {
        return Err(phone_error(format!(
            "{} digit(s) found, at least {MIN_PHONE_DIGITS} required",
            digits.len()
        )));
    }
    if digits.len() > mask.slots() {
        return Err(phone_error(format!(
            "{} digit(s) found, mask '{mask}' holds {}",
            digits.len(),
            mask.slots()
        )));
    }
    Ok(Some(Value::String(mask.render(&digits))))
}

/// Collect the digits of a phone string. Punctuation and spaces separate
/// groups; the only letters allowed are one `x` or `ext` extension marker,
/// and only after the main number.
fn extract_digits(text: &str) -> Result<String, CellError> {
    let lowered = text.trim().to_lowercase();
    let mut digits = String::new();
    let mut extension = false;
    let mut rest = lowered.as_str();
    while let Some(ch) = rest.chars().next() {
        let marker = if rest.starts_with("ext") {
            3
        } else if ch == 'x' {
            1
        } else {
            0
        };
        if marker > 0 {
            if extension {
                return Err(phone_error(format!(
                    "'{}' has more than one extension marker",
                    text.trim()
                )));
            }
            if digits.len() < MIN_PHONE_DIGITS {
                return Err(phone_error(format!(
                    "'{}' has an extension marker before the first {MIN_PHONE_DIGITS} digits",
                    text.trim()
                )));
            }
            extension = true;
            rest = &rest[marker..];
            continue;
        }
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_alphanumeric() {
            return Err(phone_error(format!(
                "'{}' contains the non-digit character '{ch}'",
                text.trim()
            )));
        }
        rest = &rest[ch.len_utf8()..];
    }
    Ok(digits)
}

fn phone_error(reason: String) -> CellError {
    CellError::new(PackingErrorKind::PhoneFormat, reason)
}
