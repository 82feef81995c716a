//! Messaging Module
//!
//! This module contains the data structures of the chat subsystem:
//!
//! - `Conversation` / `Participants` - A two-party conversation document
//! - `ChatMessage` - A message embedded in a conversation
//! - `Presence` / `PresenceUpdate` - Online state and its fan-out payload
//! - `FriendEdge` - A friendship, read to find fan-out targets
//! - `UserProfile` / `UserSummary` - Directory entries
//!
//! # Usage
//!
//! ```rust
//! use huddle::shared::messaging::{ChatMessage, Conversation, Participants};
//! ```

pub mod conversation;
pub mod friend;
pub mod message;
pub mod pagination;
pub mod presence;
pub mod user;

// Re-export all types
pub use conversation::{
    Conversation, ConversationPage, ConversationPageParams, ConversationSummary,
    DeleteConversationResponse, ListConversationsParams, ListConversationsResponse,
    MarkAllReadResponse, Participants, ToggleArchiveRequest, ToggleArchiveResponse,
    UnreadCountResponse, UnreadTotalResponse,
};
pub use friend::{FriendEdge, FriendStatus};
pub use message::{
    ChatMessage, DeleteMessageRequest, DeleteMessageResponse, DeleteMode, LastMessageResponse,
    MarkReadRequest, MarkReadResponse, MediaItem, MediaKind, SendMessageResponse,
};
pub use pagination::{message_window, MessageWindow, PageRequest};
pub use presence::{Presence, PresenceIdentity, PresenceUpdate};
pub use user::{UserProfile, UserSummary};
