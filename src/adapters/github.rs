use crate::domain::ports::PullRequestBackend;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub REST client. Requests carry the token and API version headers.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(GITHUB_API_VERSION));
        headers.insert(USER_AGENT, HeaderValue::from_static("prdrift"));
        if !token.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                SyncError::ConfigError {
                    message: format!("Invalid GitHub token: {}", e),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn preflight(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/zen", self.api_url))
            .send()
            .await
            .map_err(|e| SyncError::BackendUnreachableError {
                backend: "GitHub".to_string(),
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::PreflightError {
                backend: "GitHub".to_string(),
                status: status.as_u16(),
            });
        }
        tracing::debug!("GitHub preflight ok");
        Ok(())
    }
}

#[async_trait]
impl PullRequestBackend for GitHubClient {
    async fn pull_request_detail(&self, api_url: &str) -> Result<serde_json::Value> {
        let lookup_failed = |message: String| SyncError::PullRequestLookupError {
            reference: api_url.to_string(),
            message,
        };

        let response = self
            .client
            .get(api_url)
            .send()
            .await
            .map_err(|e| lookup_failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(lookup_failed(format!("unexpected status {}", status.as_u16())));
        }
        response.json().await.map_err(|e| lookup_failed(e.to_string()))
    }
}
