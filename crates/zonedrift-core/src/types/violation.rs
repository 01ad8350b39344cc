use serde::{Deserialize, Serialize};

/// How bad a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suboptimal but functional
    Warning,
    /// Hijackable or actively wrong
    Critical,
}

/// The specific problem found, with kind-specific evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A directed query returned a nameserver set differing from the
    /// delegation's expected set
    NsMismatch {
        /// The nameserver that was queried
        source: String,
        /// Nameserver set the query returned
        found: Vec<String>,
        /// Nameserver set the zone claims
        expected: Vec<String>,
    },

    /// The claimed nameserver refused or does not know the zone — the
    /// abandoned-delegation signal
    UnreachableNameserver {
        /// The nameserver that was queried
        source: String,
    },

    /// A directed query failed for reasons that classify neither as an
    /// answer nor as a denial (timeout, malformed response)
    QueryError {
        /// The nameserver that was queried
        source: String,
        /// What went wrong
        detail: String,
    },

    /// A record points at a platform hostname that no longer exists —
    /// the hijack signal for managed aliases
    NonexistentTarget {
        /// The dangling target value
        value: String,
    },

    /// A CNAME points at the platform where an alias-style record is
    /// preferred
    NonPreferredRecordType {
        /// The CNAME's target value
        value: String,
    },
}

impl ViolationKind {
    /// Severity implied by the violation kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NsMismatch { .. }
            | Self::UnreachableNameserver { .. }
            | Self::NonexistentTarget { .. } => Severity::Critical,
            Self::QueryError { .. } | Self::NonPreferredRecordType { .. } => Severity::Warning,
        }
    }

    /// The nameserver this violation is evidence against, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::NsMismatch { source, .. }
            | Self::UnreachableNameserver { source }
            | Self::QueryError { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One detected problem on one subject name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The checked name this violation belongs to
    pub subject: String,
    /// Severity, derived from the kind
    pub severity: Severity,
    /// The problem and its evidence
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    /// Build a violation; severity follows from the kind.
    #[must_use]
    pub fn new(subject: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            subject: subject.into(),
            severity: kind.severity(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_kind() {
        let v = Violation::new(
            "example.com.",
            ViolationKind::NonexistentTarget {
                value: "gone.elasticbeanstalk.com.".into(),
            },
        );
        assert_eq!(v.severity, Severity::Critical);

        let v = Violation::new(
            "example.com.",
            ViolationKind::NonPreferredRecordType {
                value: "env.elasticbeanstalk.com.".into(),
            },
        );
        assert_eq!(v.severity, Severity::Warning);
    }

    #[test]
    fn serializes_with_kebab_case_tag() {
        let v = Violation::new(
            "sub.example.com.",
            ViolationKind::NsMismatch {
                source: "ns1.example.net.".into(),
                found: vec!["ns9.attacker.net.".into()],
                expected: vec!["ns1.example.net.".into()],
            },
        );
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["error"], "ns-mismatch");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["source"], "ns1.example.net.");
        assert_eq!(json["found"][0], "ns9.attacker.net.");
    }
}
