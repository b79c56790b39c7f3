use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{CacheKey, DiagramRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("encode diagram record: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("cache backend: {0}")]
    Backend(String),
}

/// Key-value store holding the authoritative record for each key.
///
/// Every `put` is a full overwrite; `ttl` of `None` keeps the entry until it is
/// overwritten.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<DiagramRecord>, StoreError>;

    async fn put(
        &self,
        key: &CacheKey,
        record: &DiagramRecord,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;
}
