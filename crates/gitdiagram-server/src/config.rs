use anyhow::{Context, Result};
use gitdiagram_core::AiSettings;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8787";
pub const DEFAULT_AI_PROVIDER: &str = "openai";
pub const DEFAULT_AI_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_BATCH_SIZE: usize = 10;

const DAY: u64 = 60 * 60 * 24;
pub const DEFAULT_COMPLETE_TTL_SECS: u64 = 7 * DAY;
pub const DEFAULT_ERROR_TTL_SECS: u64 = DAY;
pub const DEFAULT_PENDING_TTL_SECS: u64 = 60 * 60;

/// How long each kind of record survives in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// `None` keeps pending records until a terminal write replaces them.
    pub pending: Option<Duration>,
    pub complete: Duration,
    pub error: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            pending: pending_ttl(DEFAULT_PENDING_TTL_SECS),
            complete: Duration::from_secs(DEFAULT_COMPLETE_TTL_SECS),
            error: Duration::from_secs(DEFAULT_ERROR_TTL_SECS),
        }
    }
}

fn pending_ttl(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

// Service configuration sourced from environment variables, optionally
// overridden by a YAML file named in GITDIAGRAM_CONFIG.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub link_host: String,
    pub github_api: String,
    pub github_token: Option<String>,
    pub ttl: TtlPolicy,
    pub batch_size: usize,
    pub ai: AiSettings,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceConfigOverride {
    bind_addr: Option<String>,
    link_host: Option<String>,
    github_api: Option<String>,
    pending_ttl_secs: Option<u64>,
    complete_ttl_secs: Option<u64>,
    error_ttl_secs: Option<u64>,
    batch_size: Option<usize>,
    ai_provider: Option<String>,
    ai_model: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let base = gitdiagram_core::read_settings(&gitdiagram_core::settings_path());
        Self::from_lookup(base, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source on top of file-based AI settings.
    pub fn from_lookup<F>(base_ai: AiSettings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("GITDIAGRAM_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse GITDIAGRAM_BIND")?;
        let link_host = lookup("GITDIAGRAM_LINK_HOST")
            .unwrap_or_else(|| gitdiagram_pipeline::DEFAULT_LINK_HOST.to_string());
        let github_api = lookup("GITDIAGRAM_GITHUB_API")
            .unwrap_or_else(|| gitdiagram_pipeline::github::DEFAULT_API_BASE.to_string());
        let github_token = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty());

        let pending = parse_u64(&lookup, "GITDIAGRAM_PENDING_TTL_SECS", DEFAULT_PENDING_TTL_SECS)?;
        let complete =
            parse_u64(&lookup, "GITDIAGRAM_COMPLETE_TTL_SECS", DEFAULT_COMPLETE_TTL_SECS)?;
        let error = parse_u64(&lookup, "GITDIAGRAM_ERROR_TTL_SECS", DEFAULT_ERROR_TTL_SECS)?;
        let batch_size =
            parse_u64(&lookup, "GITDIAGRAM_BATCH_SIZE", DEFAULT_BATCH_SIZE as u64)? as usize;

        let mut ai = base_ai;
        if let Some(provider) = lookup("GITDIAGRAM_AI_PROVIDER") {
            ai.provider = provider;
        }
        if let Some(model) = lookup("GITDIAGRAM_AI_MODEL") {
            ai.model = model;
        }
        if let Some(key) = lookup("GITDIAGRAM_AI_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            ai.api_key = key;
        }
        if ai.provider.is_empty() {
            ai.provider = DEFAULT_AI_PROVIDER.to_string();
        }
        if ai.model.is_empty() {
            ai.model = DEFAULT_AI_MODEL.to_string();
        }

        Ok(Self {
            bind_addr,
            link_host,
            github_api,
            github_token,
            ttl: TtlPolicy {
                pending: pending_ttl(pending),
                complete: Duration::from_secs(complete),
                error: Duration::from_secs(error),
            },
            batch_size: batch_size.max(1),
            ai,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("GITDIAGRAM_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read GITDIAGRAM_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    pub fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: ServiceConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse service config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.link_host {
            self.link_host = value;
        }
        if let Some(value) = override_cfg.github_api {
            self.github_api = value;
        }
        if let Some(value) = override_cfg.pending_ttl_secs {
            self.ttl.pending = pending_ttl(value);
        }
        if let Some(value) = override_cfg.complete_ttl_secs {
            self.ttl.complete = Duration::from_secs(value);
        }
        if let Some(value) = override_cfg.error_ttl_secs {
            self.ttl.error = Duration::from_secs(value);
        }
        if let Some(value) = override_cfg.batch_size {
            self.batch_size = value.max(1);
        }
        if let Some(value) = override_cfg.ai_provider {
            self.ai.provider = value;
        }
        if let Some(value) = override_cfg.ai_model {
            self.ai.model = value;
        }
        Ok(())
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.parse().with_context(|| format!("parse {key}")),
        None => Ok(default),
    }
}
