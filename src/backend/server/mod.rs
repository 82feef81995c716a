//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database connection and migrations
//! └── init.rs         - Store selection, service wiring, app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Database**: connect if `DATABASE_URL` is set, run migrations
//! 2. **Stores**: PostgreSQL with a pool, in-memory without
//! 3. **Services**: chat and presence share one `RealtimeHub`
//! 4. **Background Tasks**: empty rooms are dropped every five minutes
//! 5. **Router Creation**: routes, auth middleware and layers

/// Application state management
pub mod state;

/// Database configuration
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::{build_state, create_app, Stores};
pub use state::AppState;
