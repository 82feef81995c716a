//! Shared Error Types
//!
//! This module defines the domain error taxonomy of the chat subsystem.
//! These errors describe why an operation was refused and are shared by the
//! services and the HTTP layer, which maps each variant to a status code.
//!
//! # Error Categories
//!
//! - `ValidationError` - A required field is missing or malformed
//! - `NotFound` - A conversation, message or user does not exist (or is not visible)
//! - `Forbidden` - The caller may not perform the operation
//! - `Unauthorized` - No caller identity was supplied
//! - `SerializationError` - JSON serialization/deserialization failures
//!
//! # Usage
//!
//! ```rust
//! use huddle::shared::error::SharedError;
//!
//! let error = SharedError::validation("text", "Please provide text or media");
//! assert!(error.to_string().contains("text"));
//! ```
use thiserror::Error;

/// Domain errors raised by the chat and presence services
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The addressed resource does not exist for this caller
    #[error("{resource} not found")]
    NotFound {
        /// What was looked up ("Chat", "Message", "Recipient", ...)
        resource: String,
    },

    /// The caller is identified but not allowed to do this
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// No caller identity
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
