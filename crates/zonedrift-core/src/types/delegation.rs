use serde::{Deserialize, Serialize};

use super::record::{normalize_name, RecordKind};

/// A zone delegation: a name plus the nameservers it is delegated to.
///
/// Derived from the NS record sets sharing one name. The nameserver list
/// is normalized and sorted at construction so that fan-out order,
/// evidence fields, and serialized reports are reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// Delegated zone name, fully qualified
    pub zone: String,
    /// Expected nameserver hostnames, normalized and sorted
    pub nameservers: Vec<String>,
}

impl Delegation {
    /// Build a delegation, normalizing and sorting the nameserver set.
    #[must_use]
    pub fn new(zone: impl Into<String>, nameservers: impl IntoIterator<Item = String>) -> Self {
        let mut nameservers: Vec<String> =
            nameservers.into_iter().map(|ns| normalize_name(&ns)).collect();
        nameservers.sort_unstable();
        nameservers.dedup();
        Self {
            zone: normalize_name(&zone.into()),
            nameservers,
        }
    }
}

/// A record pointing at a managed platform hostname.
///
/// Selected because its target value contains the platform's domain
/// suffix. The record type is kept so policy checks can distinguish
/// CNAME records from alias-style records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedAlias {
    /// The record's own name
    pub name: String,
    /// The platform hostname the record points at
    pub value: String,
    /// Record type (CNAME vs alias-capable A/AAAA)
    pub kind: RecordKind,
}

impl ManagedAlias {
    /// Alias-style records are preferred over CNAME for platform targets.
    #[must_use]
    pub fn is_preferred(&self) -> bool {
        self.kind != RecordKind::Cname
    }
}
