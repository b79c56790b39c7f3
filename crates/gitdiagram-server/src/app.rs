//! HTTP application wiring: shared state and route composition.
use std::sync::Arc;

use axum::routing::any;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::coordinator::JobCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<JobCoordinator>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    // Methods are checked inside the handlers so non-GET requests get 405
    // on every path, matched or not.
    Router::new()
        .route("/{owner}/{repo}", any(api::diagrams::get_diagram))
        .route("/{owner}/{repo}/", any(api::diagrams::get_diagram))
        .route("/{owner}/{repo}/{*page}", any(api::diagrams::get_diagram_page))
        .fallback(api::diagrams::invalid_path)
        .with_state(state)
        .layer(trace_layer)
}
