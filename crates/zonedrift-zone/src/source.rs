//! The zone listing contract and the pagination-following enumerator.

use async_trait::async_trait;
use tracing::{debug, warn};
use zonedrift_core::{DriftError, PageToken, RecordPage, RecordSet, Result};

use crate::config::RetryConfig;

/// Read-only access to a hosted zone's paginated record listing.
///
/// One call returns one page; the provider signals continuation through
/// the page's `(next name, next type)` cursor. Implementations must not
/// mutate zone state.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Fetch one page of the zone's record sets, starting at `token`
    /// (or the beginning when `None`).
    async fn list_page(&self, zone_id: &str, token: Option<&PageToken>) -> Result<RecordPage>;
}

/// Retrieve the complete record set of a zone, fully materialized.
///
/// Follows the pagination cursor until the provider stops returning one.
/// A page fetch that fails with a retryable error is retried with
/// exponential backoff up to `retry.max_retries` times; exhaustion (or a
/// non-retryable failure) surfaces as [`DriftError::Enumeration`].
pub async fn enumerate(
    source: &dyn ZoneSource,
    zone_id: &str,
    retry: &RetryConfig,
) -> Result<Vec<RecordSet>> {
    let mut records = Vec::new();
    let mut token: Option<PageToken> = None;
    let mut pages = 0u32;

    loop {
        let page = fetch_page(source, zone_id, token.as_ref(), retry).await?;
        pages += 1;
        debug!(
            zone_id,
            page = pages,
            count = page.record_sets.len(),
            "fetched record page"
        );

        let next = page.next();
        records.extend(page.record_sets);

        match next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    debug!(zone_id, total = records.len(), pages, "zone enumeration complete");
    Ok(records)
}

async fn fetch_page(
    source: &dyn ZoneSource,
    zone_id: &str,
    token: Option<&PageToken>,
    retry: &RetryConfig,
) -> Result<RecordPage> {
    let mut attempt = 0u32;
    loop {
        match source.list_page(zone_id, token).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                let backoff = retry.backoff_for(attempt);
                warn!(
                    zone_id,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "transient page fetch failure, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(DriftError::Enumeration(format!(
                    "page fetch for zone {zone_id} failed after {attempt} retries: {e}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use zonedrift_core::RecordKind;

    /// Serves a fixed page sequence, failing the first `fail_first`
    /// fetches with a retryable error.
    struct ScriptedSource {
        pages: Vec<RecordPage>,
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl ScriptedSource {
        fn new(pages: Vec<RecordPage>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
                fail_first: 0,
            }
        }

        fn failing_first(mut self, n: usize) -> Self {
            self.fail_first = n;
            self
        }
    }

    #[async_trait]
    impl ZoneSource for ScriptedSource {
        async fn list_page(
            &self,
            _zone_id: &str,
            token: Option<&PageToken>,
        ) -> Result<RecordPage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(DriftError::Http("connection reset".into()));
            }
            let index = match token {
                None => 0,
                Some(t) => self
                    .pages
                    .iter()
                    .position(|p| {
                        p.record_sets
                            .first()
                            .is_some_and(|r| r.name == t.name && r.kind == t.kind)
                    })
                    .expect("token must point at a known page"),
            };
            Ok(self.pages[index].clone())
        }
    }

    fn ns_record(name: &str) -> RecordSet {
        RecordSet {
            name: name.into(),
            kind: RecordKind::Ns,
            values: vec!["ns1.example.net.".into()],
            alias_target: None,
        }
    }

    fn three_pages() -> Vec<RecordPage> {
        vec![
            RecordPage {
                record_sets: vec![ns_record("a.example.com."), ns_record("b.example.com.")],
                next_name: Some("c.example.com.".into()),
                next_type: Some(RecordKind::Ns),
            },
            RecordPage {
                record_sets: vec![ns_record("c.example.com."), ns_record("d.example.com.")],
                next_name: Some("e.example.com.".into()),
                next_type: Some(RecordKind::Ns),
            },
            RecordPage {
                record_sets: vec![ns_record("e.example.com.")],
                next_name: None,
                next_type: None,
            },
        ]
    }

    #[tokio::test]
    async fn concatenates_all_pages_in_order() {
        let source = ScriptedSource::new(three_pages());
        let records = enumerate(&source, "Z123", &RetryConfig::default())
            .await
            .unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "a.example.com.",
                "b.example.com.",
                "c.example.com.",
                "d.example.com.",
                "e.example.com."
            ]
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_transient_failures_then_succeeds() {
        let source = ScriptedSource::new(three_pages()).failing_first(2);
        let retry = RetryConfig::default().initial_backoff(std::time::Duration::from_millis(1));
        let records = enumerate(&source, "Z123", &retry).await.unwrap();
        assert_eq!(records.len(), 5);
        // 2 failures + 3 successful pages
        assert_eq!(source.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn surfaces_fatal_error_after_exhausting_retries() {
        let source = ScriptedSource::new(three_pages()).failing_first(10);
        let retry = RetryConfig::default()
            .max_retries(2)
            .initial_backoff(std::time::Duration::from_millis(1));
        let err = enumerate(&source, "Z123", &retry).await.unwrap_err();
        assert!(matches!(err, DriftError::Enumeration(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
