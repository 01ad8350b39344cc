use serde::{Deserialize, Serialize};

/// DNS record set type as stored by the authoritative zone.
///
/// The catch-all variant keeps the listing API forward compatible with
/// types this checker has no opinion about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    /// Nameserver delegation
    Ns,
    /// Canonical name
    Cname,
    /// IPv4 address (alias-capable)
    A,
    /// IPv6 address (alias-capable)
    Aaaa,
    /// Mail exchanger
    Mx,
    /// Text record
    Txt,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
    /// Any other record type, carried verbatim
    #[serde(untagged)]
    Other(String),
}

impl RecordKind {
    /// Wire representation of the type, e.g. `NS`
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ns => "NS",
            Self::Cname => "CNAME",
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record set from the hosted zone, snapshotted at enumeration time.
///
/// Either `values` (literal record values) or `alias_target` (an
/// alias-style reference to another DNS name) is populated, mirroring the
/// listing API's shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Fully-qualified record name with trailing dot
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub kind: RecordKind,

    /// Literal record values, empty for alias records
    #[serde(default)]
    pub values: Vec<String>,

    /// Alias target DNS name, if this is an alias-style record
    #[serde(default)]
    pub alias_target: Option<String>,
}

/// Pagination cursor for the zone listing API.
///
/// The provider hands back the name and type of the first record of the
/// next page; both must be echoed to continue the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    /// Name of the first record set on the next page
    pub name: String,
    /// Type of the first record set on the next page
    pub kind: RecordKind,
}

/// One page of the zone listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    /// Record sets on this page
    #[serde(default)]
    pub record_sets: Vec<RecordSet>,

    /// Name component of the continuation cursor
    #[serde(default)]
    pub next_name: Option<String>,

    /// Type component of the continuation cursor
    #[serde(default)]
    pub next_type: Option<RecordKind>,
}

impl RecordPage {
    /// Continuation token for the next page.
    ///
    /// The listing is finished when either cursor component is absent.
    #[must_use]
    pub fn next(&self) -> Option<PageToken> {
        match (&self.next_name, &self.next_type) {
            (Some(name), Some(kind)) => Some(PageToken {
                name: name.clone(),
                kind: kind.clone(),
            }),
            _ => None,
        }
    }
}

/// Normalize a DNS name for comparison: lowercase with a trailing dot.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut n = name.trim().to_ascii_lowercase();
    if !n.ends_with('.') {
        n.push('.');
    }
    n
}
