//! Managed-alias verification: is the platform target still there?

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, warn};
use zonedrift_core::{ManagedAlias, Violation, ViolationKind, ViolationReport};

use crate::dns::{DnsQuerier, QueryOutcome};
use crate::scan::ScanOptions;

enum AliasCheck {
    Done(Vec<Violation>),
    Skipped,
}

/// Verify every record pointing at the managed platform.
///
/// A CNAME always earns a record-type warning; a target that fails to
/// resolve with NXDOMAIN is the orphaned-hostname hijack signal. Any
/// other resolution outcome is logged and ignored.
pub async fn check_aliases(
    querier: &Arc<dyn DnsQuerier>,
    aliases: &[ManagedAlias],
    opts: &ScanOptions,
) -> (ViolationReport, bool) {
    let semaphore = Arc::new(Semaphore::new(opts.concurrency));
    let mut handles = Vec::new();

    for alias in aliases {
        let sem = Arc::clone(&semaphore);
        let querier = Arc::clone(querier);
        let alias = alias.clone();
        let deadline = opts.deadline;

        handles.push(tokio::spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                return AliasCheck::Skipped;
            };
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return AliasCheck::Skipped;
            }
            AliasCheck::Done(check_alias(querier.as_ref(), &alias).await)
        }));
    }

    let mut report = ViolationReport::new();
    let mut complete = true;
    for handle in handles {
        match handle.await {
            Ok(AliasCheck::Done(violations)) => {
                for violation in violations {
                    report.push(violation);
                }
            }
            Ok(AliasCheck::Skipped) => complete = false,
            Err(e) => {
                warn!(error = %e, "alias check task failed");
                complete = false;
            }
        }
    }
    (report, complete)
}

async fn check_alias(querier: &dyn DnsQuerier, alias: &ManagedAlias) -> Vec<Violation> {
    let mut violations = Vec::new();

    // The record-type policy check does not depend on resolution.
    if !alias.is_preferred() {
        violations.push(Violation::new(
            &alias.name,
            ViolationKind::NonPreferredRecordType {
                value: alias.value.clone(),
            },
        ));
    }

    match querier.resolve(&alias.value).await {
        QueryOutcome::Answered(addresses) => {
            debug!(
                name = %alias.name,
                target = %alias.value,
                addresses = %addresses.join(", "),
                "platform target resolves"
            );
        }
        QueryOutcome::NameNotFound => {
            warn!(
                name = %alias.name,
                target = %alias.value,
                "record points at a nonexistent platform hostname"
            );
            violations.push(Violation::new(
                &alias.name,
                ViolationKind::NonexistentTarget {
                    value: alias.value.clone(),
                },
            ));
        }
        // Not the hijack signal; leave a trace and move on.
        QueryOutcome::NoAuthority => {
            debug!(name = %alias.name, target = %alias.value, "no answer for platform target");
        }
        QueryOutcome::Transient(detail) => {
            debug!(name = %alias.name, target = %alias.value, %detail, "platform target query failed");
        }
    }

    violations
}
