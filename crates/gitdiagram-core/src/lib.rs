pub mod completion;
pub mod filter;
pub mod queue;
pub mod rewrite;
pub mod source;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use completion::{CompletionError, CompletionService, StageInput};
pub use queue::{JobQueue, QueueError};
pub use source::{FetchStep, RepoDataError, RepoDataSource, RepoMetadata};
pub use store::{CacheStore, StoreError};

// --- Keys and records ---

/// Cache identity of one repository's diagram: `diagram:<owner>:<repo>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self(format!("diagram:{owner}:{repo}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramStatus {
    Pending,
    Complete,
    Error,
}

impl fmt::Display for DiagramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagramStatus::Pending => "pending",
            DiagramStatus::Complete => "complete",
            DiagramStatus::Error => "error",
        })
    }
}

/// The persisted lifecycle state of a diagram.
///
/// Serialized as a flat object tagged by `status`, so a `diagram` payload only
/// ever appears on complete records and an `error` only on failed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DiagramRecord {
    Pending {
        created_at: DateTime<Utc>,
    },
    Complete {
        diagram: String,
        completed_at: DateTime<Utc>,
    },
    Error {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl DiagramRecord {
    pub fn pending() -> Self {
        DiagramRecord::Pending {
            created_at: Utc::now(),
        }
    }

    pub fn complete(diagram: impl Into<String>) -> Self {
        DiagramRecord::Complete {
            diagram: diagram.into(),
            completed_at: Utc::now(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        DiagramRecord::Error {
            error: error.into(),
            failed_at: Utc::now(),
        }
    }

    pub fn status(&self) -> DiagramStatus {
        match self {
            DiagramRecord::Pending { .. } => DiagramStatus::Pending,
            DiagramRecord::Complete { .. } => DiagramStatus::Complete,
            DiagramRecord::Error { .. } => DiagramStatus::Error,
        }
    }

    pub fn diagram(&self) -> Option<&str> {
        match self {
            DiagramRecord::Complete { diagram, .. } => Some(diagram),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DiagramRecord::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DiagramRecord::Pending { .. })
    }
}

/// Unit of work handed to the job queue. Carries no generation state; the
/// worker recomputes everything from `owner`/`repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMessage {
    pub owner: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<CacheKey>,
}

impl JobMessage {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            cache_key: Some(CacheKey::new(owner, repo)),
        }
    }
}

/// Repository data gathered once per job and shared by every generation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// Filtered paths, newline-delimited, in tree order.
    pub file_tree: String,
    pub readme: String,
    pub default_branch: String,
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

/// Resolve the global settings directory (~/.gitdiagram/).
pub fn settings_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gitdiagram")
}

pub fn settings_path() -> PathBuf {
    settings_dir().join("settings.json")
}

/// Read AI settings from `path`. Missing or unreadable files yield defaults.
pub fn read_settings(path: &Path) -> AiSettings {
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
