//! Mapping from domain failures to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::common::ApiResponse;
use crate::domain::DomainError;

/// Shown for store failures; details stay in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to complete the request. Please try again.";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => Self::not_found(err.to_string()),
            DomainError::Validation(msg) => Self::bad_request(msg),
            DomainError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            DomainError::Unauthorized(msg) => Self::unauthorized(msg),
            DomainError::Forbidden(msg) => Self::forbidden(msg),
            DomainError::Store(msg) => {
                error!(error = %msg, "Store failure while handling request");
                Self::internal()
            }
            DomainError::Configuration(msg) => {
                error!(error = %msg, "Configuration failure while handling request");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}
