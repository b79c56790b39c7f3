use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Which remote repository call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStep {
    Repository,
    Tree,
    Readme,
    ReadmeContent,
}

impl fmt::Display for FetchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchStep::Repository => "repository info",
            FetchStep::Tree => "file tree",
            FetchStep::Readme => "README",
            FetchStep::ReadmeContent => "README content",
        })
    }
}

#[derive(Debug, Error)]
pub enum RepoDataError {
    #[error("Failed to fetch {step}: {status}")]
    Status { step: FetchStep, status: u16 },
    #[error("Failed to fetch {step}: {message}")]
    Transport { step: FetchStep, message: String },
}

impl RepoDataError {
    pub fn step(&self) -> FetchStep {
        match self {
            RepoDataError::Status { step, .. } | RepoDataError::Transport { step, .. } => *step,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RepoDataError::Status { status, .. } => Some(*status),
            RepoDataError::Transport { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoMetadata {
    pub default_branch: Option<String>,
}

/// Read-only access to a hosted repository.
#[async_trait]
pub trait RepoDataSource: Send + Sync {
    async fn repository(&self, owner: &str, repo: &str) -> Result<RepoMetadata, RepoDataError>;

    /// Every path of the recursive tree at `branch`, in the order the host returns them.
    async fn tree(&self, owner: &str, repo: &str, branch: &str)
        -> Result<Vec<String>, RepoDataError>;

    /// Raw README text, resolved through the host's download location.
    async fn readme(&self, owner: &str, repo: &str) -> Result<String, RepoDataError>;
}
