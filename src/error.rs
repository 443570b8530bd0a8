//! Error types for ReadOps server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned in JSON error bodies. One code per
/// `AppError` arm; the message carries the entity detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NotFound = 3,
    InvalidAccessType = 4,
    InvalidState = 5,
    AccessNotValid = 6,
    BadValue = 7,
    Duplicate = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid access type: {0}")]
    InvalidAccessType(String),

    #[error("Access not valid: {0}")]
    AccessNotValid(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone())
            }
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, ErrorCode::InvalidState, msg.clone())
            }
            AppError::InvalidAccessType(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidAccessType, msg.clone())
            }
            AppError::AccessNotValid(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::AccessNotValid, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, serde_json::from_slice(&bytes).expect("Invalid JSON body"))
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) =
            response_parts(AppError::NotFound("User with id 7 not found".into())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::NotFound as u32);
        assert_eq!(body["error"], "NotFound");
        assert_eq!(body["message"], "User with id 7 not found");
    }

    #[tokio::test]
    async fn test_invalid_state_body() {
        let (status, body) =
            response_parts(AppError::InvalidState("Payment request 3 is not pending".into()))
                .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], ErrorCode::InvalidState as u32);
        assert_eq!(body["error"], "InvalidState");
    }

    #[tokio::test]
    async fn test_access_not_valid_body() {
        let (status, body) =
            response_parts(AppError::AccessNotValid("No valid access".into())).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], ErrorCode::AccessNotValid as u32);
    }
}
