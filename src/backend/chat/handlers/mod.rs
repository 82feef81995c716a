//! HTTP handlers for the `/chat` routes.
//!
//! All of them sit behind the auth middleware and take the caller from the
//! `AuthUser` extractor.

pub mod conversations;
pub mod messages;

pub use conversations::{
    conversation_with_user, delete_conversation, list_conversations, mark_all_read, toggle_archive,
    unread_for_conversation, unread_total,
};
pub use messages::{delete_message, last_message, mark_read_by_ids, send_message};
