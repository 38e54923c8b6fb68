//! API Error Handling
//!
//! Unified error types and conversion for API responses. Service failures
//! translate into 4xx responses carrying a message; storage errors stay
//! opaque to callers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use slipway_core::ports::RepositoryError;

use crate::service::approval::WorkflowError;
use crate::service::release::ReleaseError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    StorageError(RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::StorageError(err) => {
                tracing::error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ReleaseError> for ApiError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::NotFound(id) => ApiError::NotFound(format!("Release {} not found", id)),
            ReleaseError::ProductNotFound(id) => {
                ApiError::NotFound(format!("Product {} not found", id))
            }
            ReleaseError::FeatureNotFound(id) => {
                ApiError::NotFound(format!("Feature {} not found", id))
            }
            ReleaseError::BugNotFound(id) => ApiError::NotFound(format!("Bug {} not found", id)),
            ReleaseError::ValidationError(msg) => ApiError::BadRequest(msg),
            ReleaseError::Conflict => {
                ApiError::Conflict("Release was modified concurrently; reload and retry".to_string())
            }
            ReleaseError::RepositoryError(err) => ApiError::StorageError(err),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::WorkflowNotFound(feature_id) => {
                ApiError::NotFound(format!("Approval workflow not found for feature {}", feature_id))
            }
            WorkflowError::FeatureNotFound(id) => {
                ApiError::NotFound(format!("Feature {} not found", id))
            }
            WorkflowError::ValidationError(msg) => ApiError::BadRequest(msg),
            WorkflowError::Conflict => {
                ApiError::Conflict("Workflow was modified concurrently; reload and retry".to_string())
            }
            WorkflowError::RepositoryError(err) => ApiError::StorageError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
