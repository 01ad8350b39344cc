//! Delegation verification: directed NS queries per claimed nameserver.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, warn};
use zonedrift_core::{Delegation, Violation, ViolationKind, ViolationReport};

use crate::dns::{DnsQuerier, QueryOutcome};
use crate::scan::ScanOptions;

enum NsCheck {
    Done(Option<Violation>),
    Skipped,
}

/// Verify every delegation against each of its claimed nameservers.
///
/// Each (zone, nameserver) pair is an independent unit of evidence: one
/// stale server trips a violation even when its siblings agree with the
/// zone, and a failing unit never blocks the others. Units fan out
/// through a semaphore-bounded pool and are collected in spawn order, so
/// the per-zone violation order is reproducible.
///
/// Returns the report plus `false` when the scan deadline forced units
/// to be skipped.
pub async fn check_delegations(
    querier: &Arc<dyn DnsQuerier>,
    delegations: &[Delegation],
    opts: &ScanOptions,
) -> (ViolationReport, bool) {
    let semaphore = Arc::new(Semaphore::new(opts.concurrency));
    let mut handles = Vec::new();

    for delegation in delegations {
        for ns in &delegation.nameservers {
            let sem = Arc::clone(&semaphore);
            let querier = Arc::clone(querier);
            let zone = delegation.zone.clone();
            let expected = delegation.nameservers.clone();
            let ns = ns.clone();
            let deadline = opts.deadline;

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return NsCheck::Skipped;
                };
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return NsCheck::Skipped;
                }
                NsCheck::Done(check_nameserver(querier.as_ref(), &zone, &ns, &expected).await)
            }));
        }
    }

    let mut report = ViolationReport::new();
    let mut complete = true;
    for handle in handles {
        match handle.await {
            Ok(NsCheck::Done(Some(violation))) => report.push(violation),
            Ok(NsCheck::Done(None)) => {}
            Ok(NsCheck::Skipped) => complete = false,
            Err(e) => {
                warn!(error = %e, "delegation check task failed");
                complete = false;
            }
        }
    }
    (report, complete)
}

/// One directed check: does `ns` still answer authoritatively for `zone`
/// with the expected nameserver set?
async fn check_nameserver(
    querier: &dyn DnsQuerier,
    zone: &str,
    ns: &str,
    expected: &[String],
) -> Option<Violation> {
    match querier.query_ns(zone, ns).await {
        QueryOutcome::Answered(found) => {
            let found_set: BTreeSet<&str> = found.iter().map(String::as_str).collect();
            let expected_set: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
            if found_set == expected_set {
                debug!(zone, server = ns, "delegation confirmed");
                return None;
            }
            let mut found = found;
            found.sort_unstable();
            found.dedup();
            warn!(zone, server = ns, "nameserver returned a different NS set");
            Some(Violation::new(
                zone,
                ViolationKind::NsMismatch {
                    source: ns.to_string(),
                    found,
                    expected: expected.to_vec(),
                },
            ))
        }
        // The claimed server refuses or no longer knows the zone: the
        // abandoned-delegation signal.
        QueryOutcome::NameNotFound | QueryOutcome::NoAuthority => {
            warn!(zone, server = ns, "nameserver does not serve the zone");
            Some(Violation::new(
                zone,
                ViolationKind::UnreachableNameserver {
                    source: ns.to_string(),
                },
            ))
        }
        QueryOutcome::Transient(detail) => {
            warn!(zone, server = ns, %detail, "directed query failed");
            Some(Violation::new(
                zone,
                ViolationKind::QueryError {
                    source: ns.to_string(),
                    detail,
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::mock::MockQuerier;
    use std::time::Duration;

    fn delegation(zone: &str, nameservers: &[&str]) -> Delegation {
        Delegation::new(zone, nameservers.iter().map(ToString::to_string))
    }

    fn answered(names: &[&str]) -> QueryOutcome {
        QueryOutcome::Answered(names.iter().map(ToString::to_string).collect())
    }

    fn querier(mock: MockQuerier) -> Arc<dyn DnsQuerier> {
        Arc::new(mock)
    }

    #[tokio::test]
    async fn clean_zone_produces_empty_report() {
        let expected = ["ns1.example.net.", "ns2.example.net."];
        let mock = MockQuerier::new()
            .with_ns("sub.example.com.", "ns1.example.net.", answered(&expected))
            .with_ns("sub.example.com.", "ns2.example.net.", answered(&expected));
        let querier = querier(mock);

        let (report, complete) = check_delegations(
            &querier,
            &[delegation("sub.example.com.", &expected)],
            &ScanOptions::default(),
        )
        .await;

        assert!(report.is_empty());
        assert!(complete);
    }

    #[tokio::test]
    async fn mismatch_is_recorded_per_nameserver() {
        let mock = MockQuerier::new()
            .with_ns(
                "sub.example.com.",
                "ns1.example.net.",
                answered(&["ns1.example.net.", "ns2.example.net."]),
            )
            // ns2 answers with an extra name
            .with_ns(
                "sub.example.com.",
                "ns2.example.net.",
                answered(&["ns1.example.net.", "ns2.example.net.", "ns9.attacker.net."]),
            );
        let querier = querier(mock);

        let (report, _) = check_delegations(
            &querier,
            &[delegation("sub.example.com.", &["ns1.example.net.", "ns2.example.net."])],
            &ScanOptions::default(),
        )
        .await;

        let violations = report.get("sub.example.com.").unwrap();
        assert_eq!(violations.len(), 1);
        match &violations[0].kind {
            ViolationKind::NsMismatch { source, found, expected } => {
                assert_eq!(source, "ns2.example.net.");
                assert!(found.contains(&"ns9.attacker.net.".to_string()));
                assert_eq!(expected.len(), 2);
            }
            other => panic!("unexpected violation: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_is_independent_of_sibling_outcomes() {
        let expected = ["ns1.example.net.", "ns2.example.net."];
        let mock = MockQuerier::new()
            .with_ns("sub.example.com.", "ns1.example.net.", answered(&expected))
            .with_ns("sub.example.com.", "ns2.example.net.", QueryOutcome::NoAuthority);
        let querier = querier(mock);

        let (report, _) = check_delegations(
            &querier,
            &[delegation("sub.example.com.", &expected)],
            &ScanOptions::default(),
        )
        .await;

        let violations = report.get("sub.example.com.").unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].kind,
            ViolationKind::UnreachableNameserver {
                source: "ns2.example.net.".into()
            }
        );
    }

    #[tokio::test]
    async fn transient_failures_become_query_errors() {
        let mock = MockQuerier::new().with_ns(
            "sub.example.com.",
            "ns1.example.net.",
            QueryOutcome::Transient("query timed out".into()),
        );
        let querier = querier(mock);

        let (report, complete) = check_delegations(
            &querier,
            &[delegation("sub.example.com.", &["ns1.example.net."])],
            &ScanOptions::default(),
        )
        .await;

        assert!(complete);
        let violations = report.get("sub.example.com.").unwrap();
        assert!(matches!(
            violations[0].kind,
            ViolationKind::QueryError { .. }
        ));
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let expected = ["ns1.example.net.", "ns2.example.net."];
        let mock = MockQuerier::new()
            .with_ns("a.example.com.", "ns1.example.net.", QueryOutcome::NoAuthority)
            .with_ns("a.example.com.", "ns2.example.net.", answered(&["ns9.other.net."]))
            .with_ns("b.example.com.", "ns1.example.net.", answered(&expected))
            .with_ns("b.example.com.", "ns2.example.net.", answered(&expected));
        let querier = querier(mock);
        let delegations = [
            delegation("a.example.com.", &expected),
            delegation("b.example.com.", &expected),
        ];

        let (first, _) =
            check_delegations(&querier, &delegations, &ScanOptions::default()).await;
        let (second, _) =
            check_delegations(&querier, &delegations, &ScanOptions::default()).await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first.get("a.example.com.").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn expired_deadline_skips_units_but_keeps_report() {
        let mock = MockQuerier::new();
        let querier = querier(mock);
        let opts = ScanOptions {
            deadline: Some(Instant::now() - Duration::from_millis(10)),
            ..ScanOptions::default()
        };

        let (report, complete) = check_delegations(
            &querier,
            &[delegation("sub.example.com.", &["ns1.example.net."])],
            &opts,
        )
        .await;

        assert!(report.is_empty());
        assert!(!complete);
    }
}
