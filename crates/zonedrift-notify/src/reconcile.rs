//! Idempotent issue reconciliation.
//!
//! The invariant after every run: the set of open tickets in a category
//! equals the set of names the current report flags. Repeated runs with
//! unchanged state change nothing.

use tracing::{debug, info};
use zonedrift_core::{Result, ViolationReport};

use crate::gitlab::GitlabClient;

/// Label applied to every ticket this tool manages.
pub const BASE_LABEL: &str = "zonedrift";

/// Which check a ticket belongs to; determines its label and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// NS delegation drift
    Delegation,
    /// Managed platform alias drift
    ManagedAlias,
}

impl Category {
    /// Category label on the ticket
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delegation => "delegation",
            Self::ManagedAlias => "beanstalk",
        }
    }

    /// Deterministic ticket title for a subject name
    #[must_use]
    pub fn title_for(self, subject: &str) -> String {
        match self {
            Self::Delegation => format!("{subject} delegation error"),
            Self::ManagedAlias => format!("{subject} abandoned beanstalk"),
        }
    }
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Tickets newly created
    pub created: usize,
    /// Stale tickets closed
    pub closed: usize,
    /// Tickets already matching the report, left untouched
    pub unchanged: usize,
}

/// Reconcile the tracker's open tickets in one category with the report.
///
/// Creates a ticket for every flagged name that lacks one, leaves
/// matching tickets alone, and closes tickets whose name is no longer
/// flagged, leaving an explanatory note.
pub async fn reconcile_issues(
    client: &GitlabClient,
    category: Category,
    report: &ViolationReport,
) -> Result<ReconcileSummary> {
    let labels = [BASE_LABEL, category.label()];
    let mut open = client.list_open_issues(&labels).await?;
    let mut summary = ReconcileSummary::default();

    for (subject, violations) in report.iter() {
        let title = category.title_for(subject);
        if let Some(pos) = open.iter().position(|i| i.title == title) {
            debug!(subject, %title, "ticket already filed, skipping");
            open.remove(pos);
            summary.unchanged += 1;
        } else {
            info!(subject, %title, "filing ticket");
            let description = format!(
                "```json\n{}\n```",
                serde_json::to_string_pretty(violations)?
            );
            client.create_issue(&title, &description, &labels).await?;
            summary.created += 1;
        }
    }

    // Whatever is left no longer appears in the report.
    for leftover in open {
        info!(title = %leftover.title, iid = leftover.iid, "closing stale ticket");
        client
            .add_note(
                leftover.iid,
                "This name no longer shows up in the latest scan. Closing automatically.",
            )
            .await?;
        client.close_issue(leftover.iid).await?;
        summary.closed += 1;
    }

    Ok(summary)
}
