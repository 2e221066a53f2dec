//! Error types for intros
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// Errors propagate to the caller unchanged. Nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid acting account (401)
    #[error("Authentication required")]
    Unauthenticated,

    /// An edge already exists between the pair, or a unique key clashed (409)
    #[error("Already exists")]
    AlreadyExists,

    /// Pending request or account not found (404)
    #[error("Resource not found")]
    NotFound,

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying data store call failed (503)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(sqlx::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    /// Unique constraint violations become `AlreadyExists` and CHECK
    /// violations become `Validation`; everything else is a store failure.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::AlreadyExists;
            }
            if db_err.is_check_violation() {
                tracing::debug!(error = %db_err, "Check constraint rejected write");
                return AppError::Validation("value rejected by a data constraint".to_string());
            }
        }
        AppError::StoreUnavailable(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// Short machine-readable label, used for metrics
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "unauthenticated",
            AppError::AlreadyExists => "already_exists",
            AppError::NotFound => "not_found",
            AppError::Validation(_) => "validation",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Store and internal details are logged, never returned.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message) = match &self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::AlreadyExists => (StatusCode::CONFLICT, self.to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::StoreUnavailable(err) => {
                tracing::error!(error = %err, "Store call failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Store unavailable".to_string(),
                )
            }
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        crate::metrics::ERRORS_TOTAL
            .with_label_values(&[self.error_type()])
            .inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        let cases = [
            (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AppError::AlreadyExists, StatusCode::CONFLICT),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::StoreUnavailable(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn non_constraint_sqlx_errors_are_store_failures() {
        let error = AppError::from(sqlx::Error::PoolClosed);
        assert!(matches!(error, AppError::StoreUnavailable(_)));
    }
}
