//! API error types, rendered as the standard response envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::types::ApiResponse;
use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::inspection::InspectionError;

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(detail) => {
                tracing::warn!(detail, "Request rejected");
                (StatusCode::BAD_REQUEST, detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Database(e) => e.into(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_constraint_violation() {
            tracing::warn!(error = %err, "Database constraint violated");
            ApiError::BadRequest("Database operation failed".into())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<InspectionError> for ApiError {
    fn from(err: InspectionError) -> Self {
        match err {
            InspectionError::Database(e) => e.into(),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}
