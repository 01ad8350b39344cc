//! Alert-topic publishing.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, info};
use zonedrift_core::{DriftError, Result, ViolationReport};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fire-and-forget alert destination.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Publish one message to the topic.
    async fn publish(&self, subject: &str, message: &str) -> Result<()>;
}

/// [`AlertSink`] that POSTs the alert to a topic endpoint as JSON.
#[derive(Clone)]
pub struct HttpTopicSink {
    http: HttpClient,
    endpoint: String,
}

impl HttpTopicSink {
    /// Create a sink for the given topic endpoint
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("zonedrift/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl AlertSink for HttpTopicSink {
    async fn publish(&self, subject: &str, message: &str) -> Result<()> {
        debug!(endpoint = %self.endpoint, subject, "publishing alert");
        let body = serde_json::json!({
            "subject": subject,
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
        });
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| DriftError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DriftError::Api {
                code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }
}

/// Publish a scan summary to the alert topic.
///
/// Fires only when the report is non-empty; returns whether a publish
/// happened.
pub async fn notify_topic(sink: &dyn AlertSink, report: &ViolationReport) -> Result<bool> {
    if report.is_empty() {
        info!("no violations found, skipping alert publish");
        return Ok(false);
    }

    let subject = format!("Zonedrift violations @ {}", Utc::now().to_rfc3339());
    let message = format!(
        "Zonedrift found abandoned or misconfigured delegations and platform \
         records. Take action to prevent zone hijacking.\n\n{}",
        serde_json::to_string_pretty(report)?
    );
    sink.publish(&subject, &message).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zonedrift_core::{Violation, ViolationKind};

    fn non_empty_report() -> ViolationReport {
        std::iter::once(Violation::new(
            "example.com.",
            ViolationKind::UnreachableNameserver {
                source: "ns1.example.net.".into(),
            },
        ))
        .collect()
    }

    #[tokio::test]
    async fn empty_report_publishes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let sink = HttpTopicSink::new(format!("{}/topic", server.uri()));
        let published = notify_topic(&sink, &ViolationReport::new()).await.unwrap();
        assert!(!published);
    }

    #[tokio::test]
    async fn non_empty_report_is_published_with_serialized_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/topic"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpTopicSink::new(format!("{}/topic", server.uri()));
        let published = notify_topic(&sink, &non_empty_report()).await.unwrap();
        assert!(published);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["subject"].as_str().unwrap().starts_with("Zonedrift violations @"));
        assert!(body["message"].as_str().unwrap().contains("unreachable-nameserver"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn publish_failure_surfaces_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/topic"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sink = HttpTopicSink::new(format!("{}/topic", server.uri()));
        let err = notify_topic(&sink, &non_empty_report()).await.unwrap_err();
        assert!(matches!(err, DriftError::Api { code: 500, .. }));
    }
}
