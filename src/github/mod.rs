pub mod types;

pub use types::PullRequest;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

const API_BASE: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("GitHub token not found in config or environment")]
    MissingToken,
}

impl GithubError {
    /// Whether this error is the API rejecting an update-branch call
    /// because the head branch has merge conflicts. The API signals this
    /// only through the message text, so this stays a substring match
    /// until a structured error code exists to switch on.
    pub fn is_merge_conflict(&self) -> bool {
        match self {
            GithubError::Api {
                message: Some(message),
                ..
            } => message.contains("merge conflict"),
            _ => false,
        }
    }
}

/// Shape of a GitHub API error body.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The two remote capabilities the orchestrator needs. A trait so the
/// batch logic can be exercised against a scripted fake.
#[async_trait]
pub trait PullsApi: Send + Sync {
    /// Enumerate every open pull request targeting `base_branch`, across
    /// all result pages, ordered by creation time ascending.
    async fn list_open_pulls(&self, base_branch: &str) -> Result<Vec<PullRequest>, GithubError>;

    /// Merge the current base branch into the PR's head branch.
    async fn update_branch(&self, pull_number: u64) -> Result<(), GithubError>;
}

/// REST client for one repository.
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn new(owner: &str, repo: &str, token: String) -> GithubClient {
        GithubClient {
            http: reqwest::Client::new(),
            token,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    async fn fetch_pulls_page(
        &self,
        base_branch: &str,
        page: usize,
    ) -> Result<Vec<PullRequest>, GithubError> {
        let url = format!("{}/repos/{}/{}/pulls", API_BASE, self.owner, self.repo);

        debug!(page, "fetching pull request page");
        let response = self
            .http
            .get(&url)
            .header("User-Agent", "pr-sync")
            .bearer_auth(&self.token)
            .query(&[
                ("state", "open"),
                ("base", base_branch),
                ("sort", "created"),
                ("direction", "asc"),
                ("per_page", &PER_PAGE.to_string()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json::<Vec<PullRequest>>().await?)
    }

    /// Turn a non-success response into a GithubError::Api, pulling the
    /// `message` field out of the body when it parses.
    async fn api_error(response: reqwest::Response) -> GithubError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .map(|b| b.message);
        GithubError::Api { status, message }
    }
}

/// Accumulate result pages starting at page 1 until one comes back with
/// fewer than PER_PAGE items. Enumeration order is preserved.
async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<PullRequest>, GithubError>
where
    F: FnMut(usize) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<PullRequest>, GithubError>>,
{
    let mut pulls = Vec::new();
    let mut page = 1usize;
    loop {
        let batch = fetch(page).await?;
        let full_page = batch.len() == PER_PAGE;
        pulls.extend(batch);
        if !full_page {
            break;
        }
        page += 1;
    }
    Ok(pulls)
}

#[async_trait]
impl PullsApi for GithubClient {
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo))]
    async fn list_open_pulls(&self, base_branch: &str) -> Result<Vec<PullRequest>, GithubError> {
        let pulls = collect_pages(|page| self.fetch_pulls_page(base_branch, page)).await?;
        debug!(count = pulls.len(), "enumerated open pull requests");
        Ok(pulls)
    }

    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo))]
    async fn update_branch(&self, pull_number: u64) -> Result<(), GithubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/update-branch",
            API_BASE, self.owner, self.repo, pull_number
        );

        debug!("requesting head branch update");
        let response = self
            .http
            .put(&url)
            .header("User-Agent", "pr-sync")
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }
}
