//! Chat Message Data Structure
//!
//! Represents a message embedded in a two-party conversation, plus the
//! request/response bodies of the message-level endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conversation::Participants;

/// Kind of an attached media file, derived from the MIME top-level type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Classify a MIME type (`image/png` -> `Image`). Other top-level types are unsupported.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top_level = mime.split('/').next()?.trim().to_ascii_lowercase();
        match top_level.as_str() {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "audio" => Some(MediaKind::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

/// A stored attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaItem {
    /// Public URL returned by the media store
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// Represents a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// User who sent the message
    pub sender: Uuid,
    /// Message text, empty when the message only carries media
    #[serde(default)]
    pub text: String,
    /// Attachments in upload order
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Users this message is hidden for
    #[serde(default)]
    pub deleted_for: Vec<Uuid>,
    /// Whether the recipient has read the message
    #[serde(default)]
    pub is_read: bool,
    /// When the message was sent
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new unread message
    pub fn new(sender: Uuid, text: String, media: Vec<MediaItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text,
            media,
            deleted_for: Vec::new(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Whether `viewer` can still see this message
    pub fn is_visible_to(&self, viewer: Uuid) -> bool {
        !self.deleted_for.contains(&viewer)
    }

    /// Hide the message for `user`. Returns false if it was already hidden.
    pub fn hide_for(&mut self, user: Uuid) -> bool {
        if self.deleted_for.contains(&user) {
            return false;
        }
        self.deleted_for.push(user);
        true
    }

    /// Whether every participant has hidden this message
    pub fn is_hidden_for_all(&self, participants: &Participants) -> bool {
        participants.iter().all(|p| self.deleted_for.contains(&p))
    }

    /// Unread from `reader`'s perspective: sent by someone else and not yet read
    pub fn is_unread_for(&self, reader: Uuid) -> bool {
        self.sender != reader && !self.is_read
    }

    /// Mark read on behalf of `reader`. Returns true if the flag flipped.
    pub fn mark_read_by(&mut self, reader: Uuid) -> bool {
        if self.is_unread_for(reader) {
            self.is_read = true;
            true
        } else {
            false
        }
    }

    pub fn media_urls(&self) -> impl Iterator<Item = &str> {
        self.media.iter().map(|m| m.url.as_str())
    }
}

/// Deletion scope requested by the client.
///
/// Any value other than `"Everyone"` means "for me only".
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum DeleteMode {
    Everyone,
    ForSelf,
}

impl From<String> for DeleteMode {
    fn from(value: String) -> Self {
        if value == "Everyone" {
            DeleteMode::Everyone
        } else {
            DeleteMode::ForSelf
        }
    }
}

/// Response after sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub new_message: ChatMessage,
    pub recipient_id: Uuid,
    pub chat_id: Uuid,
    pub client_id: Option<String>,
}

/// Request to delete a single message
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub delete_for: DeleteMode,
    pub chat_id: Uuid,
    pub message_id: Uuid,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
}

/// Response after deleting a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageResponse {
    pub message: String,
    pub deleted_message_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub delete_for_everyone: bool,
}

/// Request to mark specific messages as read
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    #[serde(default)]
    pub chat_id: Option<Uuid>,
    #[serde(default)]
    pub message_ids: Vec<Uuid>,
}

/// Response after marking messages as read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub message: String,
    pub count: usize,
}

/// Response carrying the last visible message of a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageResponse {
    pub last_message: Option<ChatMessage>,
}
