//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("{0}")]
    Conflict(String),

    #[error("User not found")]
    UserNotFound(i64),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Duplicate username, whether caught by the pre-check or by the store
    pub fn username_taken() -> Self {
        AppError::Conflict("Username already registered".to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request: the public contract reports duplicate usernames as 400
            AppError::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict", None),

            // 404 Not Found
            AppError::UserNotFound(id) => {
                (StatusCode::NOT_FOUND, "user_not_found", Some(id.to_string()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidField { .. } => (
                    StatusCode::BAD_REQUEST,
                    "invalid_request",
                    Some(domain_err.to_string()),
                ),
                DomainError::InvalidAmount(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "invalid_amount",
                    Some(msg.clone()),
                ),
                DomainError::PasswordHash(msg) => {
                    tracing::error!("Password hashing failed: {}", msg);
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
            },

            AppError::Store(StoreError::UniqueViolation { .. }) => {
                (StatusCode::BAD_REQUEST, "conflict", None)
            }

            // 500 Internal Server Error
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        // Server-side failures must not leak store or driver messages
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_conflict_is_bad_request() {
        let (status, body) = render(AppError::username_taken()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Username already registered");
        assert_eq!(body["error_code"], "conflict");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_store_unique_violation_is_conflict() {
        let err = AppError::from(StoreError::UniqueViolation {
            constraint: "users.username".to_string(),
        });

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "conflict");
    }

    #[tokio::test]
    async fn test_user_not_found() {
        let (status, body) = render(AppError::UserNotFound(9999)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
        assert_eq!(body["details"], "9999");
    }

    #[tokio::test]
    async fn test_database_error_is_opaque() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_code"], "database_error");
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_invalid_amount_is_unprocessable() {
        let err = AppError::from(DomainError::InvalidAmount("NaN".to_string()));
        let (status, _) = render(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
