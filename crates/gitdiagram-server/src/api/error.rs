//! Error responses shared by the diagram endpoints.
//!
//! Validation failures are plain text. Everything else is JSON with an
//! `error` summary and a `message` detail.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::coordinator::CoordinatorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Rejected before touching the cache.
    Validation { status: StatusCode, message: String },
    /// JSON failure body.
    Failure { status: StatusCode, body: ErrorBody },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { status, .. } | ApiError::Failure { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { status, message } => (status, message).into_response(),
            ApiError::Failure { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub fn api_method_not_allowed() -> ApiError {
    ApiError::Validation {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "Method not allowed".to_string(),
    }
}

pub fn api_invalid_path() -> ApiError {
    ApiError::Validation {
        status: StatusCode::BAD_REQUEST,
        message: "Invalid path. Use format: /owner/repo".to_string(),
    }
}

/// A stored `error` record, served back to the caller until it expires.
pub fn api_generation_failed(message: &str) -> ApiError {
    ApiError::Failure {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorBody {
            status: Some("error"),
            error: "Diagram generation failed".to_string(),
            message: message.to_string(),
        },
    }
}

pub fn api_internal(err: &CoordinatorError) -> ApiError {
    tracing::error!(error = %err, "diagram request failed");
    ApiError::Failure {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorBody {
            status: None,
            error: "Internal server error".to_string(),
            message: err.to_string(),
        },
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(err: CoordinatorError) -> Self {
        api_internal(&err)
    }
}
