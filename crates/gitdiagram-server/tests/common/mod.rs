#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use gitdiagram_core::{
    CacheKey, CacheStore, CompletionError, CompletionService, DiagramRecord, FetchStep,
    RepoDataError, RepoDataSource, RepoMetadata, StageInput, StoreError,
};
use gitdiagram_pipeline::Pipeline;
use gitdiagram_server::config::TtlPolicy;
use gitdiagram_server::store::MemoryCacheStore;
use gitdiagram_server::{build_runtime, Runtime};

pub const DIAGRAM: &str = "flowchart TD\n  Api --> Db\n  click Api \"server/api\"\n  click Db \"db/schema.sql\"";

/// Serves a small fixed repository; `missing` answers 404 on the first call.
pub struct FakeRepo;

#[async_trait]
impl RepoDataSource for FakeRepo {
    async fn repository(&self, _: &str, repo: &str) -> Result<RepoMetadata, RepoDataError> {
        if repo == "missing" {
            return Err(RepoDataError::Status {
                step: FetchStep::Repository,
                status: 404,
            });
        }
        Ok(RepoMetadata {
            default_branch: Some("master".into()),
        })
    }

    async fn tree(&self, _: &str, _: &str, _: &str) -> Result<Vec<String>, RepoDataError> {
        Ok(vec![
            "server/api/routes.rs".into(),
            "db/schema.sql".into(),
            "node_modules/x/index.js".into(),
        ])
    }

    async fn readme(&self, _: &str, _: &str) -> Result<String, RepoDataError> {
        Ok("# Hello World".into())
    }
}

/// Answers every stage with [`DIAGRAM`] and counts calls.
#[derive(Default)]
pub struct CannedCompletion {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CompletionService for CannedCompletion {
    async fn complete(&self, _: &str, _: &StageInput) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("```mermaid\n{DIAGRAM}\n```"))
    }
}

/// Cache whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    async fn get(&self, _: &CacheKey) -> Result<Option<DiagramRecord>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn put(
        &self,
        _: &CacheKey,
        _: &DiagramRecord,
        _: Option<Duration>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

pub struct Harness {
    pub runtime: Runtime,
    pub cache: Arc<MemoryCacheStore>,
    pub completion: Arc<CannedCompletion>,
}

pub fn harness() -> Harness {
    let cache = Arc::new(MemoryCacheStore::new());
    let completion = Arc::new(CannedCompletion::default());
    let pipeline = Pipeline::new(Arc::new(FakeRepo), completion.clone());
    let runtime = build_runtime(pipeline, cache.clone(), TtlPolicy::default());
    Harness {
        runtime,
        cache,
        completion,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    request("GET", uri)
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8")
}
