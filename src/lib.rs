//! Huddle - Chat & Presence Backend
//!
//! Huddle is the chat subsystem of a social-networking backend: two-party
//! conversations with media attachments, per-user soft deletion and archiving,
//! unread/read bookkeeping, and friend presence fan-out over WebSockets.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared with clients
//!   - Conversations, messages, presence payloads, realtime frames
//!   - Domain error taxonomy and configuration
//!
//! - **`backend`** - The Axum server
//!   - Chat and presence services
//!   - Store traits with PostgreSQL and in-memory implementations
//!   - External collaborators (user directory, friend graph, media, push)
//!   - Realtime rooms, WebSocket transport, HTTP routes and auth middleware
//!
//! # Usage
//!
//! ```rust,no_run
//! use huddle::backend::server::init::create_app;
//! use huddle::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Services are cheap to clone (`Arc` inside) and every store implementation
//! is `Send + Sync`. Consistency of a single conversation relies on the
//! store's per-document atomicity; there is no other locking.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
