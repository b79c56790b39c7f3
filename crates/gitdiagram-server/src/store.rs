//! In-process [`CacheStore`] with per-entry expiry.
//!
//! Records are kept as serialized JSON text, the same shape an external
//! key-value store would hold. Expiry uses the tokio clock, so paused-time
//! tests can fast-forward through TTLs.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use gitdiagram_core::{CacheKey, CacheStore, DiagramRecord, StoreError};
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry {
    payload: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries. Expired ones are purged first.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stored JSON text for `key`, ignoring expiry.
    pub async fn raw(&self, key: &CacheKey) -> Option<String> {
        self.entries
            .read()
            .await
            .get(key)
            .map(|entry| entry.payload.clone())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<DiagramRecord>, StoreError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(serde_json::from_str(&entry.payload)?));
                }
                Some(_) => {}
            }
        }

        // Expired: purge unless a writer replaced it in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            tracing::debug!(cache_key = %key, "expired cache entry purged");
        }
        Ok(None)
    }

    async fn put(
        &self,
        key: &CacheKey,
        record: &DiagramRecord,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)?;
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .write()
            .await
            .insert(key.clone(), Entry { payload, expires_at });
        Ok(())
    }
}
