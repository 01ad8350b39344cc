//! Configuration from a flat parameter namespace.
//!
//! Deployments hand this tool its settings as flat `category/key` paths
//! (environment variables here; a parameter store upstream uses the same
//! convention). A pure function nests the flat listing into a tree, and
//! typed extraction pulls the recognized keys out of it. Missing
//! required keys are fatal before any network I/O happens.

use std::collections::BTreeMap;

use zonedrift_core::{DriftError, Result};

/// Environment variable prefix, e.g. `ZONEDRIFT_GITLAB_TOKEN`.
pub const ENV_PREFIX: &str = "ZONEDRIFT_";

/// A nested configuration value built from flat parameter paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamTree {
    /// A terminal value
    Leaf(String),
    /// A category of further keys
    Node(BTreeMap<String, ParamTree>),
}

impl ParamTree {
    /// Nest flat `(path, value)` parameters into a tree.
    ///
    /// Path segments split on `/`; empty segments and segments equal to
    /// `root` are skipped, so `/zonedrift/gitlab/token` and
    /// `gitlab/token` land in the same place. Segments are stored
    /// lowercased, so a later `route53/zoneId` overwrites an earlier
    /// `route53/zoneid`. Pure: no state survives the call.
    pub fn nest<I>(params: I, root: &str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut tree = BTreeMap::new();
        for (path, value) in params {
            let segments: Vec<&str> = path
                .split('/')
                .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(root))
                .collect();
            if !segments.is_empty() {
                insert(&mut tree, &segments, value);
            }
        }
        Self::Node(tree)
    }

    /// Look up a leaf value; segment comparison is case-insensitive so
    /// `route53/zoneId` finds a parameter stored as `route53/zoneid`.
    #[must_use]
    pub fn get(&self, path: &[&str]) -> Option<&str> {
        match (self, path) {
            (Self::Leaf(value), []) => Some(value),
            (Self::Node(map), [head, rest @ ..]) => map
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(head))
                .and_then(|(_, child)| child.get(rest)),
            _ => None,
        }
    }

    /// True when the category exists at the top level.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        match self {
            Self::Node(map) => map.keys().any(|k| k.eq_ignore_ascii_case(group)),
            Self::Leaf(_) => false,
        }
    }
}

fn insert(node: &mut BTreeMap<String, ParamTree>, segments: &[&str], value: String) {
    match segments {
        [] => {}
        [last] => {
            node.insert(last.to_ascii_lowercase(), ParamTree::Leaf(value));
        }
        [head, rest @ ..] => {
            let child = node
                .entry(head.to_ascii_lowercase())
                .or_insert_with(|| ParamTree::Node(BTreeMap::new()));
            if !matches!(child, ParamTree::Node(_)) {
                *child = ParamTree::Node(BTreeMap::new());
            }
            if let ParamTree::Node(map) = child {
                insert(map, rest, value);
            }
        }
    }
}

/// Flat parameters from the process environment.
///
/// `ZONEDRIFT_ROUTE53_ZONEID=Z123` becomes `("route53/zoneid", "Z123")`.
#[must_use]
pub fn env_params() -> Vec<(String, String)> {
    std::env::vars()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(ENV_PREFIX)?;
            let path = rest
                .split('_')
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
                .join("/");
            Some((path, value))
        })
        .collect()
}

/// Zone data source settings.
#[derive(Debug, Clone)]
pub struct ZoneConfig {
    /// Hosted zone to scan
    pub zone_id: String,
    /// Base URL of the zone listing API
    pub endpoint: String,
    /// Bearer token for the listing API
    pub token: Option<String>,
}

/// Issue-tracker sink settings; all three are required together.
#[derive(Debug, Clone)]
pub struct GitlabConfig {
    /// GitLab API endpoint
    pub endpoint: String,
    /// Project (id or namespaced path) that tracks tickets
    pub project: String,
    /// API token
    pub token: String,
}

/// Alert-topic sink settings.
#[derive(Debug, Clone)]
pub struct SnsConfig {
    /// Topic endpoint to publish alerts to
    pub topic: String,
}

/// Fully-resolved invocation configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Zone data source
    pub zone: ZoneConfig,
    /// Issue-tracker sink, absent when its group is not configured
    pub gitlab: Option<GitlabConfig>,
    /// Alert-topic sink, absent when its group is not configured
    pub sns: Option<SnsConfig>,
}

impl Config {
    /// Extract the recognized keys from a nested parameter tree.
    ///
    /// `route53/zoneId` and `route53/endpoint` are required. The gitlab
    /// and sns groups are optional; when a group is present, its keys
    /// are required. An absent group disables that sink.
    pub fn from_tree(tree: &ParamTree) -> Result<Self> {
        let zone = ZoneConfig {
            zone_id: require(tree, &["route53", "zoneId"])?,
            endpoint: require(tree, &["route53", "endpoint"])?,
            token: tree.get(&["route53", "token"]).map(ToString::to_string),
        };

        let gitlab = if tree.has_group("gitlab") {
            Some(GitlabConfig {
                endpoint: require(tree, &["gitlab", "endpoint"])?,
                project: require(tree, &["gitlab", "project"])?,
                token: require(tree, &["gitlab", "token"])?,
            })
        } else {
            None
        };

        let sns = if tree.has_group("sns") {
            Some(SnsConfig {
                topic: require(tree, &["sns", "topic"])?,
            })
        } else {
            None
        };

        Ok(Self { zone, gitlab, sns })
    }

    /// Load from the process environment, applying explicit overrides as
    /// if they were parameters.
    pub fn load(overrides: Vec<(String, String)>) -> Result<Self> {
        let mut params = env_params();
        params.extend(overrides);
        Self::from_tree(&ParamTree::nest(params, "zonedrift"))
    }
}

fn require(tree: &ParamTree, path: &[&str]) -> Result<String> {
    tree.get(path)
        .map(ToString::to_string)
        .ok_or_else(|| DriftError::Config {
            key: path.join("/"),
        })
}
