//! HTTP implementation of the zone listing source.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::debug;
use zonedrift_core::{DriftError, PageToken, RecordPage, Result};

use crate::source::ZoneSource;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Zone listing client speaking the provider's JSON record-sets API.
///
/// `GET {base}/zones/{zone_id}/records` returns one page; the `name` and
/// `type` query parameters echo the previous page's continuation cursor.
#[derive(Clone)]
pub struct HttpZoneSource {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl HttpZoneSource {
    /// Create a source for the given API base URL with default settings
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpZoneSourceBuilder::new(base_url).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> HttpZoneSourceBuilder {
        HttpZoneSourceBuilder::new(base_url)
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<RecordPage> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| DriftError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(DriftError::Json)
        } else {
            let code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(body);

            match code {
                404 => Err(DriftError::NotFound { resource: message }),
                _ => Err(DriftError::Api { code, message }),
            }
        }
    }
}

#[async_trait]
impl ZoneSource for HttpZoneSource {
    async fn list_page(&self, zone_id: &str, token: Option<&PageToken>) -> Result<RecordPage> {
        let url = format!("{}/zones/{zone_id}/records", self.base_url);
        debug!(url = %url, cursor = ?token.map(|t| t.name.as_str()), "listing record page");

        let mut request = self.http.get(&url);
        if let Some(token) = token {
            request = request.query(&[("name", token.name.as_str()), ("type", token.kind.as_str())]);
        }
        if let Some(bearer) = &self.token {
            request = request.bearer_auth(bearer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DriftError::Http(e.to_string()))?;

        self.handle_response(response).await
    }
}

/// Builder for configuring a [`HttpZoneSource`]
pub struct HttpZoneSourceBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpZoneSourceBuilder {
    /// Create a new builder for the given API base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a bearer token for the listing API
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the source
    #[must_use]
    pub fn build(self) -> HttpZoneSource {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(concat!("zonedrift/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        HttpZoneSource {
            http,
            base_url: self.base_url,
            token: self.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{enumerate, RetryConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(names: &[&str], next: Option<&str>) -> serde_json::Value {
        let record_sets: Vec<_> = names
            .iter()
            .map(|n| json!({"name": n, "type": "NS", "values": ["ns1.example.net."]}))
            .collect();
        match next {
            Some(next) => json!({
                "recordSets": record_sets,
                "nextName": next,
                "nextType": "NS",
            }),
            None => json!({ "recordSets": record_sets }),
        }
    }

    #[tokio::test]
    async fn follows_cursor_across_three_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z123/records"))
            .and(query_param_is_missing("name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                &["a.example.com.", "b.example.com."],
                Some("c.example.com."),
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/zones/Z123/records"))
            .and(query_param("name", "c.example.com."))
            .and(query_param("type", "NS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                &["c.example.com.", "d.example.com."],
                Some("e.example.com."),
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/zones/Z123/records"))
            .and(query_param("name", "e.example.com."))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page(&["e.example.com."], None)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpZoneSource::new(server.uri());
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
    }

    #[tokio::test]
    async fn sends_bearer_token_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z123/records"))
            .and(wiremock::matchers::header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&[], None)))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpZoneSource::builder(server.uri()).token("s3cret").build();
        let records = enumerate(&source, "Z123", &RetryConfig::default())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn retries_server_errors_before_giving_up() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z123/records"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/zones/Z123/records"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page(&["a.example.com."], None)),
            )
            .mount(&server)
            .await;

        let source = HttpZoneSource::new(server.uri());
        let retry = RetryConfig::default().initial_backoff(Duration::from_millis(1));
        let records = enumerate(&source, "Z123", &retry).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn missing_zone_is_fatal_without_retry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/NOPE/records"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "no such zone"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpZoneSource::new(server.uri());
        let err = enumerate(&source, "NOPE", &RetryConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DriftError::Enumeration(_)));
    }
}
