//! Aggregated packing errors for one transform.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{PackingError, PackingErrorKind};

/// Every per-cell failure of a transform, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    errors: Vec<PackingError>,
}

impl ErrorReport {
    pub fn push(&mut self, error: PackingError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[PackingError] {
        &self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackingError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rows with at least one failed field.
    pub fn affected_rows(&self) -> BTreeSet<usize> {
        self.errors.iter().map(|error| error.row).collect()
    }

    pub fn counts_by_column(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.column.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn counts_by_kind(&self) -> BTreeMap<PackingErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.kind).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a PackingError;
    type IntoIter = std::slice::Iter<'a, PackingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use qb_model::FieldId;

    use super::*;

    fn error(row: usize, column: &str, kind: PackingErrorKind) -> PackingError {
        PackingError {
            row,
            column: column.to_string(),
            field_id: FieldId::new(7).unwrap(),
            raw: "x".to_string(),
            kind,
            reason: "bad".to_string(),
        }
    }

    #[test]
    fn counts_group_errors() {
        let mut report = ErrorReport::default();
        report.push(error(0, "Phone", PackingErrorKind::PhoneFormat));
        report.push(error(2, "Phone", PackingErrorKind::PhoneFormat));
        report.push(error(2, "Joined", PackingErrorKind::DateFormat));

        assert_eq!(report.len(), 3);
        assert_eq!(report.affected_rows().into_iter().collect::<Vec<_>>(), [0, 2]);
        assert_eq!(report.counts_by_column()["Phone"], 2);
        assert_eq!(report.counts_by_kind()[&PackingErrorKind::DateFormat], 1);
    }
}
