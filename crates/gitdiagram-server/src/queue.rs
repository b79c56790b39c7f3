//! In-process job queue over an unbounded tokio channel.
use async_trait::async_trait;
use gitdiagram_core::{JobMessage, JobQueue, QueueError};
use tokio::sync::mpsc;

/// Producer half handed to the coordinator.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    tx: mpsc::UnboundedSender<JobMessage>,
}

/// Consumer half drained by the worker.
#[derive(Debug)]
pub struct JobReceiver {
    rx: mpsc::UnboundedReceiver<JobMessage>,
}

pub fn channel() -> (ChannelQueue, JobReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelQueue { tx }, JobReceiver { rx })
}

#[async_trait]
impl JobQueue for ChannelQueue {
    async fn send(&self, message: JobMessage) -> Result<(), QueueError> {
        self.tx.send(message).map_err(|_| QueueError::Closed)
    }
}

impl JobReceiver {
    /// Wait for one message, then take whatever else is already queued, up to
    /// `max` in total. `None` once every producer is gone and the queue is drained.
    pub async fn recv_batch(&mut self, max: usize) -> Option<Vec<JobMessage>> {
        let first = self.rx.recv().await?;
        let mut batch = vec![first];
        while batch.len() < max {
            match self.rx.try_recv() {
                Ok(message) => batch.push(message),
                Err(_) => break,
            }
        }
        Some(batch)
    }

    /// Take everything queued right now without waiting.
    pub fn drain(&mut self) -> Vec<JobMessage> {
        let mut out = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            out.push(message);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn batches_are_capped_and_ordered() {
        let (queue, mut receiver) = channel();
        for repo in ["a", "b", "c"] {
            queue.send(JobMessage::new("o", repo)).await.unwrap();
        }

        let batch = receiver.recv_batch(2).await.expect("batch");
        let repos: Vec<&str> = batch.iter().map(|m| m.repo.as_str()).collect();
        assert_eq!(repos, ["a", "b"]);

        let batch = receiver.recv_batch(2).await.expect("batch");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].repo, "c");
    }

    #[tokio::test]
    async fn closed_queue_ends_batches() {
        let (queue, mut receiver) = channel();
        queue.send(JobMessage::new("o", "r")).await.unwrap();
        drop(queue);
        assert_eq!(receiver.recv_batch(10).await.map(|b| b.len()), Some(1));
        assert!(receiver.recv_batch(10).await.is_none());
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_gone() {
        let (queue, receiver) = channel();
        drop(receiver);
        let err = queue.send(JobMessage::new("o", "r")).await.unwrap_err();
        assert!(matches!(err, QueueError::Closed));
    }
}
