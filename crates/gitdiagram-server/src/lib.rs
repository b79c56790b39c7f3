//! HTTP front end, job coordination and background worker for gitdiagram.
pub mod api;
pub mod app;
pub mod config;
pub mod coordinator;
pub mod observability;
pub mod queue;
pub mod store;
pub mod worker;

use std::sync::Arc;

use gitdiagram_core::CacheStore;
use gitdiagram_pipeline::Pipeline;

use app::AppState;
use config::TtlPolicy;
use coordinator::JobCoordinator;
use queue::JobReceiver;
use worker::JobWorker;

/// Everything a running service needs: request state for the router plus the
/// worker and the queue it drains.
pub struct Runtime {
    pub state: AppState,
    pub worker: JobWorker,
    pub receiver: JobReceiver,
}

/// Wire the in-process cache and queue around `pipeline`.
pub fn build_runtime(pipeline: Pipeline, cache: Arc<dyn CacheStore>, ttl: TtlPolicy) -> Runtime {
    let (queue, receiver) = queue::channel();
    let coordinator = JobCoordinator::new(cache.clone(), Arc::new(queue), ttl);
    Runtime {
        state: AppState {
            coordinator: Arc::new(coordinator),
        },
        worker: JobWorker::new(Arc::new(pipeline), cache, ttl),
        receiver,
    }
}
