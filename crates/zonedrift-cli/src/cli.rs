//! Command-line arguments.

use clap::Parser;

/// Detect abandoned DNS delegations and managed-platform aliases
#[derive(Debug, Parser)]
#[command(name = "zonedrift", version, about)]
pub struct Args {
    /// Hosted zone id to scan (overrides ZONEDRIFT_ROUTE53_ZONEID)
    #[arg(long)]
    pub zone_id: Option<String>,

    /// Zone listing API base URL (overrides ZONEDRIFT_ROUTE53_ENDPOINT)
    #[arg(long)]
    pub zone_endpoint: Option<String>,

    /// Maximum concurrent DNS queries
    #[arg(long, env = "ZONEDRIFT_CONCURRENCY", default_value_t = 32)]
    pub concurrency: usize,

    /// Per-query timeout in seconds
    #[arg(long, env = "ZONEDRIFT_QUERY_TIMEOUT", default_value_t = 5)]
    pub query_timeout: u64,

    /// Overall scan budget in seconds; checks not started by then are
    /// skipped and partial results are reported
    #[arg(long)]
    pub budget: Option<u64>,

    /// Domain suffix identifying managed-platform targets
    #[arg(long, default_value = "elasticbeanstalk.com")]
    pub platform_suffix: String,

    /// Skip notification sinks and only print the report
    #[arg(long)]
    pub no_notify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let args = Args::parse_from(["zonedrift"]);
        assert_eq!(args.concurrency, 32);
        assert_eq!(args.query_timeout, 5);
        assert_eq!(args.platform_suffix, "elasticbeanstalk.com");
        assert!(args.budget.is_none());
        assert!(!args.no_notify);
    }

    #[test]
    fn overrides_parse() {
        let args = Args::parse_from([
            "zonedrift",
            "--zone-id",
            "Z123",
            "--budget",
            "30",
            "--no-notify",
        ]);
        assert_eq!(args.zone_id.as_deref(), Some("Z123"));
        assert_eq!(args.budget, Some(30));
        assert!(args.no_notify);
    }
}
