//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Session verification for the chat routes and the socket

pub mod auth;

pub use auth::{auth_middleware, session_token, AuthUser, AuthenticatedUser, SESSION_COOKIE};
