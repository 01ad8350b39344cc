//! Invocation entry point: configure, scan, notify, report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zonedrift_check::{scan_records, DnsQuerier, HickoryQuerier, ScanOptions, ScanOutcome};
use zonedrift_core::ViolationReport;
use zonedrift_notify::{notify_topic, reconcile_issues, Category, GitlabClient, HttpTopicSink};
use zonedrift_zone::{enumerate, HttpZoneSource, RetryConfig};

use crate::cli::Args;
use crate::config::Config;

/// What the invocation hands back to its caller, also printed as JSON.
#[derive(Debug, Serialize)]
pub struct InvocationResult {
    /// Human-readable completion note
    pub message: String,
    /// The merged violation report
    pub errors: ViolationReport,
}

/// Run one scan invocation end to end.
///
/// Configuration problems are fatal before any network I/O. Sink
/// failures are logged and never turn a finished scan into a failed
/// invocation.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(overrides(&args))?;

    let mut source = HttpZoneSource::builder(&config.zone.endpoint);
    if let Some(token) = &config.zone.token {
        source = source.token(token);
    }
    let source = source.build();

    info!(zone_id = %config.zone.zone_id, "enumerating hosted zone");
    let records = enumerate(&source, &config.zone.zone_id, &RetryConfig::default()).await?;

    let querier: Arc<dyn DnsQuerier> = Arc::new(HickoryQuerier::from_system_conf(
        Duration::from_secs(args.query_timeout),
    )?);
    let opts = ScanOptions {
        concurrency: args.concurrency,
        platform_suffix: args.platform_suffix.clone(),
        deadline: args
            .budget
            .map(|secs| Instant::now() + Duration::from_secs(secs)),
    };
    let outcome = scan_records(&querier, &records, &opts).await;

    if args.no_notify {
        info!("skipping notification sinks");
    } else {
        dispatch_sinks(&config, &outcome).await;
    }

    let merged = outcome.merged();
    let result = InvocationResult {
        message: if outcome.complete {
            "Completed checking for abandoned delegations and platform aliases.".to_string()
        } else {
            "Scan budget exhausted; returning partial results.".to_string()
        },
        errors: merged,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn overrides(args: &Args) -> Vec<(String, String)> {
    let mut overrides = Vec::new();
    if let Some(zone_id) = &args.zone_id {
        overrides.push(("route53/zoneId".to_string(), zone_id.clone()));
    }
    if let Some(endpoint) = &args.zone_endpoint {
        overrides.push(("route53/endpoint".to_string(), endpoint.clone()));
    }
    overrides
}

/// Fan the finished reports out to whichever sinks are configured.
async fn dispatch_sinks(config: &Config, outcome: &ScanOutcome) {
    if let Some(gitlab) = &config.gitlab {
        let client = GitlabClient::new(&gitlab.endpoint, &gitlab.token, &gitlab.project);
        let passes = [
            (Category::Delegation, &outcome.delegations),
            (Category::ManagedAlias, &outcome.aliases),
        ];
        for (category, report) in passes {
            match reconcile_issues(&client, category, report).await {
                Ok(summary) => info!(
                    category = category.label(),
                    created = summary.created,
                    closed = summary.closed,
                    unchanged = summary.unchanged,
                    "issue reconciliation done"
                ),
                Err(e) => warn!(category = category.label(), error = %e, "issue reconciliation failed"),
            }
        }
    }

    if let Some(sns) = &config.sns {
        let sink = HttpTopicSink::new(&sns.topic);
        match notify_topic(&sink, &outcome.merged()).await {
            Ok(published) => info!(published, "alert topic handled"),
            Err(e) => warn!(error = %e, "alert publish failed"),
        }
    }
}
