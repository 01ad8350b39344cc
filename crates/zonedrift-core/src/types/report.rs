use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::violation::Violation;

/// Aggregated scan output: subject name mapped to its violations.
///
/// A name appears in the report iff its violation list is non-empty.
/// Keys iterate in sorted order; the list under one name preserves the
/// order in which the violations were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationReport {
    entries: BTreeMap<String, Vec<Violation>>,
}

impl ViolationReport {
    /// An empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record a violation under its subject name.
    pub fn push(&mut self, violation: Violation) {
        self.entries
            .entry(violation.subject.clone())
            .or_default()
            .push(violation);
    }

    /// Fold another report into this one, appending per-name lists.
    pub fn merge(&mut self, other: Self) {
        for (subject, violations) in other.entries {
            self.entries.entry(subject).or_default().extend(violations);
        }
    }

    /// True when no name has any violation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of names with at least one violation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Violations recorded for one subject name.
    #[must_use]
    pub fn get(&self, subject: &str) -> Option<&[Violation]> {
        self.entries.get(subject).map(Vec::as_slice)
    }

    /// True when the subject has at least one violation.
    #[must_use]
    pub fn contains(&self, subject: &str) -> bool {
        self.entries.contains_key(subject)
    }

    /// Subject names in sorted order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over (subject, violations) in sorted subject order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Violation])> {
        self.entries
            .iter()
            .map(|(subject, violations)| (subject.as_str(), violations.as_slice()))
    }
}

impl FromIterator<Violation> for ViolationReport {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut report = Self::new();
        for violation in iter {
            report.push(violation);
        }
        report
    }
}
