//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; no store or provider error crosses the HTTP
//! boundary unmapped.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::lifecycle::LifecycleError;
use crate::services::tokens::TokenError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Missing or malformed client input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An account with this email already exists.
    #[error("Duplicate email")]
    DuplicateEmail,

    /// Verification token not found (or already consumed).
    #[error("Verification token not found")]
    TokenNotFound,

    /// Verification token past its expiry.
    #[error("Verification token expired")]
    TokenExpired,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required provider capability is not configured.
    #[error("{0} service not configured")]
    ServiceNotConfigured(&'static str),

    /// Upstream provider failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::NotFound => Self::TokenNotFound,
            TokenError::Expired => Self::TokenExpired,
            TokenError::Repository(err) => Self::Database(err),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::InvalidInput(msg) => Self::InvalidInput(msg),
            LifecycleError::DuplicateEmail => Self::DuplicateEmail,
            LifecycleError::AccountNotFound => Self::NotFound("account".to_owned()),
            LifecycleError::Token(err) => err.into(),
            LifecycleError::Repository(err) => Self::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Upstream(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) | Self::TokenNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Database(RepositoryError::Conflict(_)) | Self::DuplicateEmail => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::TokenExpired => StatusCode::GONE,
            Self::ServiceNotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Upstream(_) => "External service error".to_owned(),
            Self::DuplicateEmail => "An account with this email already exists".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_client_error_status_codes() {
        assert_eq!(
            get_status(AppError::InvalidInput("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::DuplicateEmail), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AppError::NotFound("post".to_owned())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_token_error_status_codes() {
        assert_eq!(get_status(AppError::TokenNotFound), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::TokenExpired), StatusCode::GONE);
    }

    #[test]
    fn test_server_error_status_codes() {
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Upstream("smtp".to_owned())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::ServiceNotConfigured("messaging")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_token_error_conversion() {
        assert!(matches!(
            AppError::from(TokenError::NotFound),
            AppError::TokenNotFound
        ));
        assert!(matches!(
            AppError::from(TokenError::Expired),
            AppError::TokenExpired
        ));
    }

    #[test]
    fn test_lifecycle_error_conversion() {
        assert!(matches!(
            AppError::from(LifecycleError::DuplicateEmail),
            AppError::DuplicateEmail
        ));
        assert!(matches!(
            AppError::from(LifecycleError::Token(TokenError::Expired)),
            AppError::TokenExpired
        ));
    }
}
