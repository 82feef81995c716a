//! Chat Backend Module
//!
//! Two-party conversations: sending with attachments, per-user deletion and
//! archiving, unread counters and read-state.
//!
//! # Architecture
//!
//! - **`store`** - `ConversationStore` trait and the in-memory implementation
//! - **`db`** - PostgreSQL implementation of the store
//! - **`service`** - `ChatService`, every chat operation
//! - **`handlers`** - Axum handlers for the `/chat` routes
//!
//! # Example
//!
//! ```rust,ignore
//! use huddle::backend::chat::{ChatService, OutgoingMessage};
//!
//! let sent = chat.send_message(sender, OutgoingMessage {
//!     recipient_id,
//!     text: "Hello!".to_string(),
//!     attachments: Vec::new(),
//!     client_id: None,
//! }).await?;
//! ```

/// Database operations for conversations
pub mod db;

/// HTTP handlers
pub mod handlers;

/// Chat operations
pub mod service;

/// Conversation store trait and in-memory implementation
pub mod store;

/// Re-export commonly used types
pub use db::PgConversationStore;
pub use service::{ChatService, ChatSettings, MessageDeletion, OutgoingMessage, SentMessage};
pub use store::{ConversationChange, ConversationStore, MemoryConversationStore, ReadScope, WriteBack};
