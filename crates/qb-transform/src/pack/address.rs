//! Address strategy: several columns combine into one composite value.

use std::fmt;

use serde_json::{Map, Value};

use crate::cell::CellValue;
use crate::error::CellError;

/// One component of a street address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressPart {
    Street1,
    Street2,
    City,
    State,
    PostalCode,
    Country,
}

impl AddressPart {
    pub const ALL: [AddressPart; 6] = [
        AddressPart::Street1,
        AddressPart::Street2,
        AddressPart::City,
        AddressPart::State,
        AddressPart::PostalCode,
        AddressPart::Country,
    ];

    /// Key used in the wire object.
    pub fn wire_key(self) -> &'static str {
        match self {
            AddressPart::Street1 => "street1",
            AddressPart::Street2 => "street2",
            AddressPart::City => "city",
            AddressPart::State => "state",
            AddressPart::PostalCode => "postalCode",
            AddressPart::Country => "country",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "street1" | "street" | "street-1" => Some(AddressPart::Street1),
            "street2" | "street-2" => Some(AddressPart::Street2),
            "city" => Some(AddressPart::City),
            "state" | "region" | "province" => Some(AddressPart::State),
            "postal-code" | "postalcode" | "postal" | "zip" => Some(AddressPart::PostalCode),
            "country" => Some(AddressPart::Country),
            _ => None,
        }
    }

    pub(crate) fn from_args(args: &[String]) -> Result<Self, String> {
        match args {
            [name] => Self::from_name(name).ok_or_else(|| {
                format!(
                    "unknown address part '{name}', expected one of street1, street2, city, \
                     state, postal-code, country"
                )
            }),
            _ => Err(format!(
                "expected exactly 1 argument naming the address part, found {}",
                args.len()
            )),
        }
    }
}

impl fmt::Display for AddressPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// Convert one part's cell into its string value. Missing parts are empty.
pub fn pack_address_part(cell: &CellValue) -> Result<String, CellError> {
    if cell.is_null() {
        return Ok(String::new());
    }
    match cell {
        CellValue::Text(s) => Ok(s.trim().to_string()),
        CellValue::Int(v) => Ok(v.to_string()),
        CellValue::Float(v) => Ok(v.to_string()),
        other => Err(CellError::value_type(format!(
            "{} value cannot be used as an address part",
            other.type_name()
        ))),
    }
}

/// Assemble the wire object from already-packed parts, indexed by
/// [`AddressPart::index`].
pub fn assemble_address(parts: &[String; 6]) -> Value {
    let mut object = Map::new();
    for part in AddressPart::ALL {
        object.insert(
            part.wire_key().to_string(),
            Value::String(parts[part.index()].clone()),
        );
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::PackingErrorKind;

    #[test]
    fn part_names_and_aliases() {
        assert_eq!(AddressPart::from_name("Zip"), Some(AddressPart::PostalCode));
        assert_eq!(AddressPart::from_name("postal_code"), Some(AddressPart::PostalCode));
        assert_eq!(AddressPart::from_name("street"), Some(AddressPart::Street1));
        assert_eq!(AddressPart::from_name("planet"), None);
        assert!(AddressPart::from_args(&[]).is_err());
    }

    #[test]
    fn assembles_every_key() {
        let mut parts: [String; 6] = Default::default();
        parts[AddressPart::Street1.index()] = "1 Main St".to_string();
        parts[AddressPart::City.index()] = "Springfield".to_string();
        parts[AddressPart::PostalCode.index()] =
            pack_address_part(&CellValue::Int(12345)).unwrap();
        assert_eq!(
            assemble_address(&parts),
            json!({
                "street1": "1 Main St",
                "street2": "",
                "city": "Springfield",
                "state": "",
                "postalCode": "12345",
                "country": ""
            })
        );
    }

    #[test]
    fn booleans_are_not_address_parts() {
        let error = pack_address_part(&CellValue::Bool(true)).unwrap_err();
        assert_eq!(error.kind, PackingErrorKind::ValueType);
        assert_eq!(pack_address_part(&CellValue::Null).unwrap(), "");
    }
}
