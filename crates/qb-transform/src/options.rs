//! Transform options and the send policy for rows with errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Options controlling how a table is matched against a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Fail when the table has columns the schema does not map.
    /// Unmapped columns are ignored otherwise.
    pub reject_unmapped_columns: bool,
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reject_unmapped_columns(mut self, reject: bool) -> Self {
        self.reject_unmapped_columns = reject;
        self
    }
}

/// What to do with records that have failed fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Send nothing while any packing error is unresolved.
    #[default]
    Abort,
    /// Send only records without failed fields.
    SkipRecords,
    /// Send every record, leaving failed fields out.
    SendPartial,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Abort => "abort",
            ErrorPolicy::SkipRecords => "skip-records",
            ErrorPolicy::SendPartial => "send-partial",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(ErrorPolicy::Abort),
            "skip" | "skip-records" => Ok(ErrorPolicy::SkipRecords),
            "partial" | "send-partial" => Ok(ErrorPolicy::SendPartial),
            other => Err(format!("unknown error policy '{other}'")),
        }
    }
}
