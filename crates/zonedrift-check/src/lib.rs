//! Delegation and managed-alias verification.
//!
//! Don't trust the zone file, trust live answers. A delegation is only as
//! good as the nameservers it points at, and a platform alias is only as
//! good as the hostname it resolves to. This crate takes the enumerated
//! record set of a zone and actively re-queries the outside world:
//!
//! - **Delegations**: every claimed nameserver is asked, directly and
//!   individually, for the zone's NS set. A server that answers with a
//!   different set, or that no longer knows the zone at all, is evidence
//!   that the delegation has drifted or been abandoned.
//! - **Managed aliases**: records pointing at the managed platform's
//!   domain are resolved through the default resolver; a target that no
//!   longer exists is reclaimable by whoever asks the platform next.
//!
//! Checks fan out through a bounded worker pool and aggregate into a
//! [`ViolationReport`](zonedrift_core::ViolationReport) keyed by subject
//! name.

pub mod alias;
pub mod classify;
pub mod delegation;
pub mod dns;
pub mod scan;

pub use dns::{DnsQuerier, HickoryQuerier, QueryOutcome, DEFAULT_QUERY_TIMEOUT};
pub use scan::{scan_records, ScanOptions, ScanOutcome};
