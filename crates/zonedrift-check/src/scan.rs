//! One-shot scan over an enumerated record set.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use zonedrift_core::{RecordSet, ViolationReport};

use crate::dns::DnsQuerier;
use crate::{alias, classify, delegation};

/// Default managed-platform domain suffix.
pub const DEFAULT_PLATFORM_SUFFIX: &str = "elasticbeanstalk.com";

/// Tunables for one scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Maximum concurrent outbound queries
    pub concurrency: usize,
    /// Domain suffix identifying managed-platform targets
    pub platform_suffix: String,
    /// Overall scan deadline; units not started by then are skipped
    pub deadline: Option<Instant>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: 32,
            platform_suffix: DEFAULT_PLATFORM_SUFFIX.to_string(),
            deadline: None,
        }
    }
}

/// Outcome of one scan: per-category reports plus a completeness flag.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Violations found by the delegation verifier
    pub delegations: ViolationReport,
    /// Violations found by the managed-alias verifier
    pub aliases: ViolationReport,
    /// False when the deadline forced checks to be skipped
    pub complete: bool,
}

impl ScanOutcome {
    /// The single merged report handed to notification sinks.
    #[must_use]
    pub fn merged(&self) -> ViolationReport {
        let mut merged = self.delegations.clone();
        merged.merge(self.aliases.clone());
        merged
    }
}

/// Classify the record set and run both verifiers.
///
/// Verifier failures never abort the scan; each subject name is an
/// isolation boundary. When the deadline expires mid-scan, whatever
/// completed is still aggregated and `complete` is set to `false`.
pub async fn scan_records(
    querier: &Arc<dyn DnsQuerier>,
    records: &[RecordSet],
    opts: &ScanOptions,
) -> ScanOutcome {
    let delegations = classify::delegations(records);
    let managed = classify::managed_aliases(records, &opts.platform_suffix);
    info!(
        records = records.len(),
        delegations = delegations.len(),
        managed_aliases = managed.len(),
        "record set classified"
    );

    let (delegation_report, delegations_complete) =
        delegation::check_delegations(querier, &delegations, opts).await;
    let (alias_report, aliases_complete) = alias::check_aliases(querier, &managed, opts).await;

    let outcome = ScanOutcome {
        delegations: delegation_report,
        aliases: alias_report,
        complete: delegations_complete && aliases_complete,
    };
    info!(
        affected = outcome.merged().len(),
        complete = outcome.complete,
        "scan finished"
    );
    outcome
}
