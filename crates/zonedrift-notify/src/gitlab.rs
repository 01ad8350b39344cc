//! Minimal GitLab v4 issues client.

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use zonedrift_core::{DriftError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An issue as returned by the GitLab API (only the fields we use)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Project-scoped issue id
    pub iid: u64,
    /// Issue title
    pub title: String,
    /// Labels on the issue
    #[serde(default)]
    pub labels: Vec<String>,
    /// Issue state, e.g. `opened`
    #[serde(default)]
    pub state: String,
}

/// Issues client scoped to one GitLab project
#[derive(Clone)]
pub struct GitlabClient {
    http: HttpClient,
    base_url: String,
    token: String,
    project: String,
}

impl GitlabClient {
    /// Create a client with default settings
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        GitlabClientBuilder::new(base_url, token, project).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(
        base_url: impl Into<String>,
        token: impl Into<String>,
        project: impl Into<String>,
    ) -> GitlabClientBuilder {
        GitlabClientBuilder::new(base_url, token, project)
    }

    /// List open issues carrying all of the given labels
    pub async fn list_open_issues(&self, labels: &[&str]) -> Result<Vec<Issue>> {
        let url = format!("{}/issues", self.project_url());
        debug!(url = %url, labels = %labels.join(","), "listing open issues");

        let response = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[
                ("state", "opened"),
                ("labels", &labels.join(",")),
                ("per_page", "100"),
            ])
            .send()
            .await
            .map_err(|e| DriftError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Create an issue with the given title, description, and labels
    pub async fn create_issue(
        &self,
        title: &str,
        description: &str,
        labels: &[&str],
    ) -> Result<Issue> {
        let url = format!("{}/issues", self.project_url());
        debug!(url = %url, title, "creating issue");

        let body = serde_json::json!({
            "title": title,
            "description": description,
            "labels": labels.join(","),
        });
        let response = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DriftError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Add a note (comment) to an issue
    pub async fn add_note(&self, iid: u64, body: &str) -> Result<()> {
        let url = format!("{}/issues/{iid}/notes", self.project_url());
        debug!(url = %url, "adding note");

        let response = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| DriftError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// Close an issue
    pub async fn close_issue(&self, iid: u64) -> Result<()> {
        let url = format!("{}/issues/{iid}", self.project_url());
        debug!(url = %url, "closing issue");

        let response = self
            .http
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "state_event": "close" }))
            .send()
            .await
            .map_err(|e| DriftError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    fn project_url(&self) -> String {
        format!(
            "{}/api/v4/projects/{}",
            self.base_url,
            urlencoding::encode(&self.project)
        )
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| DriftError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(DriftError::Json)
        } else {
            Err(self.to_error(status.as_u16(), response).await)
        }
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.to_error(status.as_u16(), response).await)
        }
    }

    async fn to_error(&self, code: u16, response: reqwest::Response) -> DriftError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").map(|m| m.to_string()))
            .unwrap_or(body);

        match code {
            404 => DriftError::NotFound { resource: message },
            _ => DriftError::Api { code, message },
        }
    }
}

/// Builder for configuring a [`GitlabClient`]
pub struct GitlabClientBuilder {
    base_url: String,
    token: String,
    project: String,
    timeout: Duration,
}

impl GitlabClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            project: project.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> GitlabClient {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(concat!("zonedrift/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        GitlabClient {
            http,
            base_url: self.base_url,
            token: self.token,
            project: self.project,
        }
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
