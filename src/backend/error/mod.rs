//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are returned by services and handlers and convert to HTTP
//! responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Types
//!
//! - `HandlerError` - Request-shape errors with an explicit status
//! - `StoreError` - Conversation/presence/directory store failures
//! - `UpstreamError` - Media store and push gateway failures
//! - `SharedError` - Domain taxonomy (validation, not found, forbidden, unauthorized)
//! - `SerializationError` - JSON serialization errors

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use conversion::rejection;
pub use types::BackendError;

/// Result alias used across the backend
pub type BackendResult<T> = Result<T, BackendError>;
