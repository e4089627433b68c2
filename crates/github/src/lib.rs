//! Issue triage GitHub infrastructure adapter.
//!
//! Implements [`triage::IssueTracker`] against the GitHub REST API with a
//! plain `reqwest` client authenticated by a token.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Pagination,
//! authentication headers and payload shapes are handled here; the [`triage`]
//! crate never sees them. Requests are made once and never retried.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use triage::{
    AvailableLabels, IssueTracker, Item, ItemNumber, LabelName, RepositoryId, TrackerError,
};

mod models;

use models::{AddLabelsRequest, IssueResponse, LabelResponse};

/// Public GitHub API endpoint, used unless `GITHUB_API_URL` points elsewhere.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Bound on a single GitHub request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page size the REST API accepts.
const MAX_PAGE_SIZE: u32 = 100;

const USER_AGENT: &str = concat!("issue-triage/", env!("CARGO_PKG_VERSION"));

/// Token-authenticated GitHub REST client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    /// Creates a client for `api_base` (or [`DEFAULT_API_URL`]).
    ///
    /// # Errors
    ///
    /// [`TrackerError::Transport`] if the token is not a valid header value or
    /// the HTTP client cannot be constructed.
    pub fn new(token: &SecretString, api_base: Option<&str>) -> Result<Self, TrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret().trim()))
            .map_err(|_| TrackerError::Transport {
                message: "GitHub token contains characters not allowed in a header".to_string(),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::Transport {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_base: api_base
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn repo_url(&self, repo: &RepositoryId, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base,
            repo.owner(),
            repo.name(),
            path
        )
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, TrackerError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| TrackerError::MalformedResponse {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn fetch_open_items(
        &self,
        repo: &RepositoryId,
        limit: u32,
    ) -> Result<Vec<Item>, TrackerError> {
        let url = self.repo_url(repo, "issues");
        let per_page = limit.clamp(1, MAX_PAGE_SIZE);
        let wanted = limit as usize;
        let mut items: Vec<Item> = Vec::with_capacity(wanted);
        let mut page = 1_u32;

        while items.len() < wanted {
            let chunk: Vec<IssueResponse> = self
                .get_page(
                    &url,
                    &[
                        ("state", "open".to_string()),
                        ("sort", "created".to_string()),
                        ("direction", "desc".to_string()),
                        ("per_page", per_page.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let chunk_len = chunk.len();
            items.extend(chunk.into_iter().map(Item::from));
            if chunk_len < per_page as usize {
                break;
            }
            page = page.saturating_add(1);
        }

        items.truncate(wanted);
        tracing::debug!(repository = %repo, count = items.len(), "Fetched open items");
        Ok(items)
    }

    async fn fetch_available_labels(
        &self,
        repo: &RepositoryId,
    ) -> Result<AvailableLabels, TrackerError> {
        let url = self.repo_url(repo, "labels");
        let mut names: Vec<LabelName> = Vec::new();
        let mut page = 1_u32;

        loop {
            let chunk: Vec<LabelResponse> = self
                .get_page(
                    &url,
                    &[
                        ("per_page", MAX_PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let chunk_len = chunk.len();
            names.extend(chunk.into_iter().filter_map(LabelResponse::into_label_name));
            if chunk_len < MAX_PAGE_SIZE as usize {
                break;
            }
            page = page.saturating_add(1);
        }

        tracing::debug!(repository = %repo, count = names.len(), "Fetched repository labels");
        Ok(names.into_iter().collect())
    }

    async fn add_labels(
        &self,
        repo: &RepositoryId,
        item: ItemNumber,
        labels: &BTreeSet<LabelName>,
    ) -> Result<(), TrackerError> {
        let url = self.repo_url(repo, &format!("issues/{item}/labels"));
        let request = AddLabelsRequest {
            labels: labels.iter().map(LabelName::as_str).collect(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn transport_error(error: reqwest::Error) -> TrackerError {
    TrackerError::Transport {
        message: error.to_string(),
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TrackerError::Status {
        status: status.as_u16(),
        body,
    })
}
