//! Request-side half of the diagram lifecycle.
//!
//! The coordinator decides, per request, whether to serve a stored record,
//! report work in progress, or admit a new job. It keeps no state of its own:
//! the cache is both the result store and the admission marker.
//!
//! Admission writes `pending` and then enqueues. The two steps are not atomic,
//! so concurrent first requests for one key may both admit a job. Both jobs
//! overwrite the same key with equivalent records, which only costs a
//! duplicate generation.
use std::sync::Arc;

use gitdiagram_core::{
    CacheKey, CacheStore, DiagramRecord, JobMessage, JobQueue, QueueError, StoreError,
};
use thiserror::Error;

use crate::config::TtlPolicy;

/// What a request for a diagram resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Complete(String),
    Failed(String),
    InProgress,
    Admitted,
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

pub struct JobCoordinator {
    cache: Arc<dyn CacheStore>,
    queue: Arc<dyn JobQueue>,
    ttl: TtlPolicy,
}

impl JobCoordinator {
    pub fn new(cache: Arc<dyn CacheStore>, queue: Arc<dyn JobQueue>, ttl: TtlPolicy) -> Self {
        Self { cache, queue, ttl }
    }

    pub async fn handle(&self, owner: &str, repo: &str) -> Result<Lookup, CoordinatorError> {
        let key = CacheKey::new(owner, repo);

        match self.cache.get(&key).await? {
            Some(DiagramRecord::Pending { .. }) => Ok(Lookup::InProgress),
            Some(DiagramRecord::Complete { diagram, .. }) => Ok(Lookup::Complete(diagram)),
            Some(DiagramRecord::Error { error, .. }) => Ok(Lookup::Failed(error)),
            None => {
                self.cache
                    .put(&key, &DiagramRecord::pending(), self.ttl.pending)
                    .await?;
                self.queue.send(JobMessage::new(owner, repo)).await?;
                tracing::info!(owner, repo, cache_key = %key, "diagram job admitted");
                Ok(Lookup::Admitted)
            }
        }
    }
}
