use async_trait::async_trait;
use thiserror::Error;

use crate::JobMessage;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("job queue is closed")]
    Closed,
    #[error("job queue: {0}")]
    Backend(String),
}

/// Producer side of the work queue.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn send(&self, message: JobMessage) -> Result<(), QueueError>;
}
