//! DNS query interface and the hickory-resolver implementation.
//!
//! Query outcomes are explicit variants rather than error types: for this
//! checker NXDOMAIN and "server refuses the zone" are expected signals,
//! not failures, and each verifier maps them to violations on its own
//! terms.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use tracing::debug;
use zonedrift_core::{normalize_name, DriftError, Result};

/// Default per-query deadline.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one DNS query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The server answered; payload is the answer set (NS hostnames for a
    /// directed NS query, addresses for a plain resolution)
    Answered(Vec<String>),
    /// The queried name does not exist (NXDOMAIN)
    NameNotFound,
    /// The server answered but asserted nothing for the name: refused,
    /// servfail, or an empty answer
    NoAuthority,
    /// The query itself failed: timeout, network error, malformed response
    Transient(String),
}

/// The two query shapes the verifiers need.
#[async_trait]
pub trait DnsQuerier: Send + Sync {
    /// Query `zone`'s NS records with `server` as the sole resolver.
    ///
    /// This is the authoritative-knowledge check: it must bypass any
    /// recursive resolver so a cached stale answer cannot mask drift.
    async fn query_ns(&self, zone: &str, server: &str) -> QueryOutcome;

    /// Resolve `name` through default resolution.
    async fn resolve(&self, name: &str) -> QueryOutcome;
}

/// [`DnsQuerier`] backed by hickory-resolver.
///
/// Holds a bootstrap resolver (system configuration) for plain
/// resolution and for turning nameserver hostnames into addresses;
/// directed queries build a throwaway resolver pinned to the one target
/// server.
pub struct HickoryQuerier {
    bootstrap: TokioAsyncResolver,
    timeout: Duration,
}

impl HickoryQuerier {
    /// Build a querier from the system resolver configuration.
    pub fn from_system_conf(timeout: Duration) -> Result<Self> {
        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|e| DriftError::Dns(format!("cannot read system resolver config: {e}")))?;
        opts.timeout = timeout;
        Ok(Self {
            bootstrap: TokioAsyncResolver::tokio(config, opts),
            timeout,
        })
    }

    /// Resolver that will consult `server` and nothing else.
    fn directed_resolver(&self, ip: IpAddr) -> TokioAsyncResolver {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[ip], 53, true),
        );
        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;
        // A directed answer must come from the server itself
        opts.cache_size = 0;
        TokioAsyncResolver::tokio(config, opts)
    }

    /// Turn a nameserver hostname into an address for a directed query.
    async fn server_addr(&self, server: &str) -> std::result::Result<IpAddr, QueryOutcome> {
        if let Ok(ip) = server.trim_end_matches('.').parse::<IpAddr>() {
            return Ok(ip);
        }
        match self.bootstrap.lookup_ip(server).await {
            Ok(lookup) => lookup.iter().next().ok_or(QueryOutcome::NoAuthority),
            // A nameserver hostname that does not exist cannot serve the
            // zone; treat it the same as a server that denies the zone.
            Err(e) => match classify_error(&e) {
                QueryOutcome::NameNotFound | QueryOutcome::NoAuthority => {
                    Err(QueryOutcome::NoAuthority)
                }
                other => Err(other),
            },
        }
    }
}

#[async_trait]
impl DnsQuerier for HickoryQuerier {
    async fn query_ns(&self, zone: &str, server: &str) -> QueryOutcome {
        let ip = match self.server_addr(server).await {
            Ok(ip) => ip,
            Err(outcome) => return outcome,
        };
        debug!(zone, server, %ip, "directed NS query");

        let resolver = self.directed_resolver(ip);
        match resolver.lookup(zone, RecordType::NS).await {
            Ok(lookup) => {
                let found: Vec<String> = lookup
                    .iter()
                    .filter_map(|rdata| match rdata {
                        RData::NS(ns) => Some(normalize_name(&ns.0.to_utf8())),
                        _ => None,
                    })
                    .collect();
                if found.is_empty() {
                    QueryOutcome::NoAuthority
                } else {
                    QueryOutcome::Answered(found)
                }
            }
            Err(e) => classify_error(&e),
        }
    }

    async fn resolve(&self, name: &str) -> QueryOutcome {
        match self.bootstrap.lookup_ip(name).await {
            Ok(lookup) => {
                QueryOutcome::Answered(lookup.iter().map(|ip| ip.to_string()).collect())
            }
            Err(e) => classify_error(&e),
        }
    }
}

/// Map a resolver error onto an explicit outcome.
fn classify_error(err: &ResolveError) -> QueryOutcome {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match response_code {
            ResponseCode::NXDomain => QueryOutcome::NameNotFound,
            _ => QueryOutcome::NoAuthority,
        },
        ResolveErrorKind::Timeout => QueryOutcome::Transient("query timed out".into()),
        _ => QueryOutcome::Transient(err.to_string()),
    }
}
