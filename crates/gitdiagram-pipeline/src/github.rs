use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use gitdiagram_core::{FetchStep, RepoDataError, RepoDataSource, RepoMetadata};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const CLIENT_NAME: &str = "gitdiagram";

#[derive(Deserialize)]
struct RepoInfo {
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct TreeListing {
    tree: Vec<TreeItem>,
}

#[derive(Deserialize)]
struct TreeItem {
    path: String,
}

#[derive(Deserialize)]
struct ReadmeInfo {
    download_url: Option<String>,
}

/// [`RepoDataSource`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    async fn send(
        &self,
        url: &str,
        step: FetchStep,
        authorized: bool,
    ) -> Result<reqwest::Response, RepoDataError> {
        let mut request = self.client.get(url).header(USER_AGENT, CLIENT_NAME);
        if authorized {
            if let Some(token) = &self.token {
                request = request.header(AUTHORIZATION, format!("token {token}"));
            }
        }

        let response = request.send().await.map_err(|e| transport(step, e))?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), %step, "repository fetch failed");
            return Err(RepoDataError::Status {
                step,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        step: FetchStep,
    ) -> Result<T, RepoDataError> {
        self.send(url, step, true)
            .await?
            .json::<T>()
            .await
            .map_err(|e| transport(step, e))
    }
}

fn transport(step: FetchStep, err: reqwest::Error) -> RepoDataError {
    RepoDataError::Transport {
        step,
        message: err.to_string(),
    }
}

#[async_trait]
impl RepoDataSource for GithubSource {
    async fn repository(&self, owner: &str, repo: &str) -> Result<RepoMetadata, RepoDataError> {
        let url = format!("{}/repos/{owner}/{repo}", self.api_base);
        let info: RepoInfo = self.get_json(&url, FetchStep::Repository).await?;
        Ok(RepoMetadata {
            default_branch: info.default_branch,
        })
    }

    async fn tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<String>, RepoDataError> {
        let url = format!(
            "{}/repos/{owner}/{repo}/git/trees/{branch}?recursive=1",
            self.api_base
        );
        let listing: TreeListing = self.get_json(&url, FetchStep::Tree).await?;
        Ok(listing.tree.into_iter().map(|item| item.path).collect())
    }

    async fn readme(&self, owner: &str, repo: &str) -> Result<String, RepoDataError> {
        let url = format!("{}/repos/{owner}/{repo}/readme", self.api_base);
        let info: ReadmeInfo = self.get_json(&url, FetchStep::Readme).await?;
        let download_url = info.download_url.ok_or_else(|| RepoDataError::Transport {
            step: FetchStep::Readme,
            message: "README has no download location".to_string(),
        })?;

        self.send(&download_url, FetchStep::ReadmeContent, false)
            .await?
            .text()
            .await
            .map_err(|e| transport(FetchStep::ReadmeContent, e))
    }
}
