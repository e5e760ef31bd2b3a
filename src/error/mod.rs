//! Application error types and their HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::ErrorDetail;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown email or wrong password. Deliberately carries no detail.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Db(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Jwt(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", e),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

const REDACTED_DETAIL: &str = "internal error";

/// Failure of `POST /api/auth/login`.
///
/// Both variants answer 400. Unknown email and wrong password are merged into
/// `InvalidCredentials` so the caller cannot tell them apart; everything else
/// is `Failed` with a diagnostic string.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginError {
    InvalidCredentials,
    Failed(String),
}

impl LoginError {
    /// Request could not be parsed or validated. The diagnostic is always kept.
    pub fn malformed(detail: impl ToString) -> Self {
        LoginError::Failed(detail.to_string())
    }

    /// Map a verifier error, redacting downstream diagnostics when asked to.
    pub fn from_app(err: AppError, detail: ErrorDetail) -> Self {
        match err {
            AppError::InvalidCredentials => LoginError::InvalidCredentials,
            AppError::Validation(msg) => LoginError::Failed(msg),
            other => {
                tracing::warn!(error = %other, "login failed");
                match detail {
                    ErrorDetail::Full => LoginError::Failed(other.to_string()),
                    ErrorDetail::Redacted => LoginError::Failed(REDACTED_DETAIL.to_string()),
                }
            }
        }
    }
}

impl From<JsonRejection> for LoginError {
    fn from(rejection: JsonRejection) -> Self {
        LoginError::malformed(rejection.body_text())
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let body = match self {
            LoginError::InvalidCredentials => json!({ "message": "Invalid credentials" }),
            LoginError::Failed(detail) => json!({
                "message": "Error logging in",
                "error": detail,
            }),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
