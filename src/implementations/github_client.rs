use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::header::{ ACCEPT, AUTHORIZATION };
use std::time::Duration;
use url::Url;

use crate::config::CheckerConfig;
use crate::errors::{ CheckerError, CheckerResult };
use crate::traits::issue_tracker::IssueTracker;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Token-authenticated client for the repository issues REST API
#[derive(Clone)]
pub struct GitHubIssueClient {
    http_client: reqwest::Client,
    api_base: Url,
    repository: String,
    token: String,
}

impl GitHubIssueClient {
    pub fn new(
        api_base: &str,
        repository: &str,
        token: &str,
        timeout: Duration
    ) -> CheckerResult<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CheckerError::MissingToken);
        }

        let api_base = Url::parse(api_base).map_err(|e|
            CheckerError::InvalidUrl(format!("{}: {}", api_base, e))
        )?;

        let http_client = reqwest::Client
            ::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckerError::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base,
            repository: repository.trim_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &CheckerConfig, token: &str) -> CheckerResult<Self> {
        Self::new(&config.github.api_base, config.repository(), token, config.request_timeout())
    }

    /// `<api_base>/repos/<owner>/<name>/issues/<id>/<tail...>`, each segment
    /// percent-encoded
    pub fn issue_url(&self, issue_id: &str, tail: &[&str]) -> CheckerResult<Url> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CheckerError::InvalidUrl(self.api_base.to_string()))?;
            segments.pop_if_empty().push("repos");
            segments.extend(self.repository.split('/'));
            segments.push("issues").push(issue_id);
            segments.extend(tail);
        }
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> CheckerResult<()> {
        let response = request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .send().await
            .map_err(|e| CheckerError::Network(format!("{}: {}", action, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());
            warn!("{} failed: HTTP {} - {}", action, status.as_u16(), message);
            return Err(CheckerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("{} succeeded (HTTP {})", action, status.as_u16());
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for GitHubIssueClient {
    async fn add_labels(&self, issue_id: &str, labels: &[String]) -> CheckerResult<()> {
        let url = self.issue_url(issue_id, &["labels"])?;
        let body = serde_json::json!({ "labels": labels });
        self.send(
            self.http_client.post(url).json(&body),
            &format!("Add labels {:?} to issue #{}", labels, issue_id)
        ).await
    }

    async fn delete_label(&self, issue_id: &str, label: &str) -> CheckerResult<()> {
        let url = self.issue_url(issue_id, &["labels", label])?;
        self.send(
            self.http_client.delete(url),
            &format!("Remove label {:?} from issue #{}", label, issue_id)
        ).await
    }

    async fn post_comment(&self, issue_id: &str, body: &str) -> CheckerResult<()> {
        let url = self.issue_url(issue_id, &["comments"])?;
        let body = serde_json::json!({ "body": body });
        self.send(
            self.http_client.post(url).json(&body),
            &format!("Comment on issue #{}", issue_id)
        ).await
    }

    async fn close_issue(&self, issue_id: &str) -> CheckerResult<()> {
        let url = self.issue_url(issue_id, &[])?;
        let body = serde_json::json!({ "state": "closed" });
        self.send(
            self.http_client.patch(url).json(&body),
            &format!("Close issue #{}", issue_id)
        ).await
    }
}
