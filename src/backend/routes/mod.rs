//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, layers and public routes
//! └── chat_routes.rs  - The authenticated `/chat` routes
//! ```
//!
//! # Route Types
//!
//! ## Public
//!
//! - `GET /health` - liveness and persistence mode
//! - `GET /media/*` - uploaded attachments
//!
//! ## Authenticated
//!
//! - `/chat/*` - conversations, messages, read-state
//! - `GET /socket` - realtime WebSocket

/// Main router creation
pub mod router;

/// Chat route table
pub mod chat_routes;

// Re-export commonly used functions
pub use router::create_router;
