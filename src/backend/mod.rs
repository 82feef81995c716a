//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the chat and presence
//! services, their stores and the realtime transport.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database setup
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`chat`** - Conversations, messages, deletion, archive and read-state
//! - **`presence`** - Online/offline bookkeeping and friend fan-out
//! - **`realtime`** - Per-user rooms and the WebSocket transport
//! - **`directory`** - User profiles and the friend graph
//! - **`media`** - Attachment storage
//! - **`push`** - Push notification delivery
//! - **`auth`** - Session tokens
//! - **`middleware`** - Request authentication
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── chat/           - Chat service, stores and handlers
//! ├── presence/       - Presence service and store
//! ├── realtime/       - Rooms and WebSocket handler
//! ├── directory/      - Users and friendships
//! ├── media/          - Media store
//! ├── push/           - Push dispatcher
//! ├── auth/           - JWT sessions
//! ├── middleware/     - Auth middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the services; each service keeps its collaborators behind
//! `Arc<dyn Trait>` so PostgreSQL and in-memory stores are interchangeable.
//! Realtime rooms are `tokio::sync::broadcast` channels keyed by user id.
//!
//! # Error Handling
//!
//! Services return `BackendResult<T>`. `BackendError` maps onto HTTP status
//! codes and a `{"error", "status"}` JSON body.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat service, stores and handlers
pub mod chat;

/// Presence tracking
pub mod presence;

/// Real-time update system
pub mod realtime;

/// User directory and friend graph
pub mod directory;

/// Attachment storage
pub mod media;

/// Push notifications
pub mod push;

/// Backend error types
pub mod error;

/// Session tokens
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use chat::ChatService;
pub use error::BackendError;
pub use presence::PresenceService;
pub use realtime::RealtimeHub;
pub use server::create_app;
