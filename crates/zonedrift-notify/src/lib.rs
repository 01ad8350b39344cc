//! Notification sinks for violation reports.
//!
//! Two consumers of a finished [`ViolationReport`](zonedrift_core::ViolationReport):
//!
//! - **Issue tracker**: one open ticket per affected name per check
//!   category, reconciled idempotently so the open-ticket set always
//!   equals the current violation set.
//! - **Alert topic**: a single fire-and-forget summary publish, only when
//!   there is something to say.
//!
//! Sink failures are the caller's to log; nothing here aborts a scan.

mod gitlab;
mod reconcile;
mod topic;

pub use gitlab::{GitlabClient, GitlabClientBuilder, Issue};
pub use reconcile::{reconcile_issues, Category, ReconcileSummary, BASE_LABEL};
pub use topic::{notify_topic, AlertSink, HttpTopicSink};
