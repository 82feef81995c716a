//! Authentication Module
//!
//! Session tokens are issued elsewhere on the platform; this module verifies
//! them.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports and documentation
//! └── sessions.rs - JWT creation and verification
//! ```
//!
//! The `middleware::auth` layer uses these functions to turn a request's
//! `token` cookie or `Authorization: Bearer` header into an
//! `AuthenticatedUser`.

/// JWT token management
pub mod sessions;

pub use sessions::{create_token, user_id_from_token, verify_token, Claims, DEFAULT_TOKEN_TTL};
