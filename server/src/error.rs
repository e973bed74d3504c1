//! The error taxonomy every handler reports through.
//!
//! All failures render as `{"error": {"code": ..., "message": ...}}` with one
//! of three codes. Internal failures are logged in full and returned to the
//! client with a fixed message.

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use task_core::{TaskIdError, ValidationError};
use thiserror::Error;

use crate::repository::RepositoryError;

pub const INVALID_REQUEST: &str = "invalid_request";
pub const TASK_NOT_FOUND: &str = "task_not_found";
pub const INTERNAL_SERVER_ERROR: &str = "internal_server_error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad path parameter, undecodable body, or failed validation.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Task not found")]
    TaskNotFound,

    /// Carries the detail for the log; never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => INVALID_REQUEST,
            ApiError::TaskNotFound => TASK_NOT_FOUND,
            ApiError::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TaskNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn invalid_id(err: TaskIdError) -> Self {
        ApiError::InvalidRequest(format!("Invalid task ID: {err}"))
    }

    /// The router could not extract the path segment at all (e.g. it is not
    /// valid UTF-8 once percent-decoded).
    pub fn invalid_path(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(format!("Invalid task ID: {}", rejection.body_text()))
    }

    pub fn invalid_body(err: serde_json::Error) -> Self {
        ApiError::InvalidRequest(format!("Invalid input: {err}"))
    }
}

/// JSON body of an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.public_message(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidRequest(format!("Validation failed: {err}"))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::TaskNotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_core::TaskId;

    #[test]
    fn codes_and_statuses_line_up() {
        let cases = [
            (ApiError::InvalidRequest("x".into()), INVALID_REQUEST, 400),
            (ApiError::TaskNotFound, TASK_NOT_FOUND, 404),
            (ApiError::Internal("x".into()), INTERNAL_SERVER_ERROR, 500),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status().as_u16(), status);
        }
    }

    #[test]
    fn validation_error_becomes_invalid_request() {
        let err: ApiError = ValidationError {
            field: "title",
            reason: "is required".into(),
        }
        .into();
        assert_eq!(err.code(), INVALID_REQUEST);
        assert_eq!(err.to_string(), "Validation failed: title: is required");
    }

    #[test]
    fn repository_not_found_becomes_task_not_found() {
        let err: ApiError = RepositoryError::NotFound(TaskId::new(3)).into();
        assert!(matches!(err, ApiError::TaskNotFound));
        assert_eq!(err.to_string(), "Task not found");
    }

    #[test]
    fn other_repository_errors_become_internal() {
        let err: ApiError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code(), INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::Internal("disk full at /var/lib/tasks.db".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn error_body_has_no_status_field() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: TASK_NOT_FOUND.into(),
                message: "Task not found".into(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": {"code": "task_not_found", "message": "Task not found"}})
        );
    }
}
