/**
 * Backend Error Types
 *
 * This module defines the error type returned by services and HTTP handlers.
 *
 * # Error Categories
 *
 * ## Domain Errors
 *
 * Wrapped `SharedError`s: validation, not-found, forbidden, unauthorized.
 * They are raised immediately and never retried.
 *
 * ## Store Errors
 *
 * Failures of the conversation, presence or directory stores.
 *
 * ## Upstream Errors
 *
 * Failures of the media store or the push gateway.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use huddle::backend::error::BackendError;
///
/// let err = BackendError::store("connection reset");
/// let err = BackendError::upstream("media", "bucket unavailable");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., malformed multipart body)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// A store operation failed
    #[error("Store error: {message}")]
    StoreError {
        /// Human-readable error message
        message: String,
    },

    /// An external collaborator (media store, push gateway) failed
    #[error("Upstream error from {service}: {message}")]
    UpstreamError {
        /// Which collaborator failed
        service: &'static str,
        /// Human-readable error message
        message: String,
    },

    /// Domain error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            service,
            message: message.into(),
        }
    }

    /// Shorthand for a wrapped `SharedError::NotFound`
    pub fn not_found(resource: impl Into<String>) -> Self {
        SharedError::not_found(resource).into()
    }

    /// Whether this is a `SharedError::NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SharedError(SharedError::NotFound { .. }))
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `StoreError` - 500 Internal Server Error
    /// - `UpstreamError` - 502 Bad Gateway
    /// - `SharedError` - 400 / 404 / 403 / 401 by kind
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::StoreError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::NotFound { .. } => StatusCode::NOT_FOUND,
                SharedError::Forbidden { .. } => StatusCode::FORBIDDEN,
                SharedError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StoreError { message } => message.clone(),
            Self::UpstreamError { service, message } => format!("{} failure: {}", service, message),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::store("row not found"),
            other => Self::store(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for BackendError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::store(format!("migration failed: {}", err))
    }
}
