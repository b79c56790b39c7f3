//! Consumer side of the queue: runs the pipeline for each job and persists
//! the terminal record.
use std::sync::Arc;

use futures::future::join_all;
use gitdiagram_core::{CacheKey, CacheStore, DiagramRecord, JobMessage};
use gitdiagram_pipeline::Pipeline;

use crate::config::TtlPolicy;
use crate::queue::JobReceiver;

/// Result of processing one queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed(String),
    /// Message carried no cache key; nothing was written.
    Skipped,
}

#[derive(Clone)]
pub struct JobWorker {
    pipeline: Arc<Pipeline>,
    cache: Arc<dyn CacheStore>,
    ttl: TtlPolicy,
}

impl JobWorker {
    pub fn new(pipeline: Arc<Pipeline>, cache: Arc<dyn CacheStore>, ttl: TtlPolicy) -> Self {
        Self {
            pipeline,
            cache,
            ttl,
        }
    }

    /// Process every message concurrently. Outcomes come back in input order.
    pub async fn process_batch(&self, batch: Vec<JobMessage>) -> Vec<JobOutcome> {
        let handles: Vec<_> = batch
            .into_iter()
            .map(|message| {
                let worker = self.clone();
                let key = message.cache_key.clone();
                let handle = tokio::spawn(async move { worker.process(message).await });
                (key, handle)
            })
            .collect();

        join_all(handles.into_iter().map(|(key, handle)| async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(error = %err, "diagram job task aborted");
                    let message = format!("internal error: {err}");
                    match key {
                        Some(key) => self.record_failure(&key, &message).await,
                        None => JobOutcome::Skipped,
                    }
                }
            }
        }))
        .await
    }

    pub async fn process(&self, message: JobMessage) -> JobOutcome {
        let Some(key) = message.cache_key else {
            tracing::warn!(
                owner = %message.owner,
                repo = %message.repo,
                "job message without cache key skipped"
            );
            return JobOutcome::Skipped;
        };

        match self.pipeline.generate(&message.owner, &message.repo).await {
            Ok(artifact) => {
                let record = DiagramRecord::complete(artifact.diagram);
                match self.cache.put(&key, &record, Some(self.ttl.complete)).await {
                    Ok(()) => {
                        tracing::info!(cache_key = %key, "diagram generated");
                        JobOutcome::Completed
                    }
                    Err(err) => self.record_failure(&key, &err.to_string()).await,
                }
            }
            Err(err) => self.record_failure(&key, &err.to_string()).await,
        }
    }

    async fn record_failure(&self, key: &CacheKey, message: &str) -> JobOutcome {
        tracing::warn!(cache_key = %key, error = %message, "diagram generation failed");
        let record = DiagramRecord::failed(message);
        if let Err(err) = self.cache.put(key, &record, Some(self.ttl.error)).await {
            tracing::error!(cache_key = %key, error = %err, "could not persist error record");
        }
        JobOutcome::Failed(message.to_string())
    }

    /// Drain the queue in batches until every producer has gone away.
    pub async fn run(self, mut receiver: JobReceiver, batch_size: usize) {
        while let Some(batch) = receiver.recv_batch(batch_size).await {
            let size = batch.len();
            let outcomes = self.process_batch(batch).await;
            let failed = outcomes
                .iter()
                .filter(|o| matches!(o, JobOutcome::Failed(_)))
                .count();
            tracing::debug!(size, failed, "job batch processed");
        }
        tracing::info!("job queue closed, worker stopping");
    }
}
