//! Conversation Data Structure
//!
//! Represents a two-party conversation document: the ordered message list
//! together with the per-user soft-delete and archive markers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;
use super::user::UserSummary;
use crate::shared::error::SharedError;

/// The two distinct users of a conversation.
///
/// Stored in ascending order so that `Participants::new(a, b) == Participants::new(b, a)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<Uuid>", into = "Vec<Uuid>")]
pub struct Participants([Uuid; 2]);

impl Participants {
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, SharedError> {
        if a == b {
            return Err(SharedError::validation(
                "participants",
                "A conversation needs two different users",
            ));
        }
        Ok(if a < b { Self([a, b]) } else { Self([b, a]) })
    }

    pub fn contains(&self, user: Uuid) -> bool {
        self.0.contains(&user)
    }

    /// The participant that is not `user`, if `user` takes part at all
    pub fn other(&self, user: Uuid) -> Option<Uuid> {
        match self.0 {
            [a, b] if a == user => Some(b),
            [a, b] if b == user => Some(a),
            _ => None,
        }
    }

    pub fn low(&self) -> Uuid {
        self.0[0]
    }

    pub fn high(&self) -> Uuid {
        self.0[1]
    }

    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<Uuid>> for Participants {
    type Error = SharedError;

    fn try_from(ids: Vec<Uuid>) -> Result<Self, Self::Error> {
        match ids.as_slice() {
            [a, b] => Participants::new(*a, *b),
            _ => Err(SharedError::validation(
                "participants",
                format!("expected exactly 2 participants, got {}", ids.len()),
            )),
        }
    }
}

impl From<Participants> for Vec<Uuid> {
    fn from(participants: Participants) -> Self {
        participants.0.to_vec()
    }
}

/// A two-party conversation document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,
    pub participants: Participants,
    /// Messages, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Users who soft-deleted the whole conversation
    #[serde(default)]
    pub deleted_for: Vec<Uuid>,
    /// Users who archived the conversation
    #[serde(default)]
    pub archived_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new, empty conversation
    pub fn new(participants: Participants) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            participants,
            messages: Vec::new(),
            deleted_for: Vec::new(),
            archived_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_participant(&self, user: Uuid) -> bool {
        self.participants.contains(user)
    }

    /// Participant and not soft-deleted by them
    pub fn is_visible_to(&self, user: Uuid) -> bool {
        self.has_participant(user) && !self.deleted_for.contains(&user)
    }

    /// Undo a soft delete for `user`. Returns true if the marker was present.
    pub fn restore_for(&mut self, user: Uuid) -> bool {
        let before = self.deleted_for.len();
        self.deleted_for.retain(|id| *id != user);
        before != self.deleted_for.len()
    }

    /// Hide every message and the conversation itself for `user`
    pub fn hide_all_for(&mut self, user: Uuid) {
        for message in &mut self.messages {
            message.hide_for(user);
        }
        if !self.deleted_for.contains(&user) {
            self.deleted_for.push(user);
        }
    }

    /// Every participant has soft-deleted the conversation
    pub fn is_deleted_for_all(&self) -> bool {
        self.participants.iter().all(|p| self.deleted_for.contains(&p))
    }

    pub fn is_archived_for(&self, user: Uuid) -> bool {
        self.archived_by.contains(&user)
    }

    /// Flip `user`'s archive marker and return the new state
    pub fn toggle_archive(&mut self, user: Uuid) -> bool {
        if self.is_archived_for(user) {
            self.archived_by.retain(|id| *id != user);
            false
        } else {
            self.archived_by.push(user);
            true
        }
    }

    /// Messages `viewer` can see, oldest first
    pub fn visible_messages(&self, viewer: Uuid) -> Vec<&ChatMessage> {
        self.messages.iter().filter(|m| m.is_visible_to(viewer)).collect()
    }

    pub fn last_visible_message(&self, viewer: Uuid) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.is_visible_to(viewer))
    }

    pub fn message_index(&self, message_id: Uuid) -> Option<usize> {
        self.messages.iter().position(|m| m.id == message_id)
    }

    pub fn unread_count_for(&self, reader: Uuid) -> usize {
        self.messages.iter().filter(|m| m.is_unread_for(reader)).count()
    }

    /// Mark every message from the other side as read. Returns how many flipped.
    pub fn mark_all_read(&mut self, reader: Uuid) -> usize {
        self.messages
            .iter_mut()
            .map(|m| m.mark_read_by(reader))
            .filter(|flipped| *flipped)
            .count()
    }

    /// Mark the listed messages as read, skipping the reader's own messages.
    /// Returns how many flipped.
    pub fn mark_read_by_ids(&mut self, reader: Uuid, message_ids: &[Uuid]) -> usize {
        self.messages
            .iter_mut()
            .filter(|m| message_ids.contains(&m.id))
            .map(|m| m.mark_read_by(reader))
            .filter(|flipped| *flipped)
            .count()
    }

    /// URLs of every attachment in the conversation
    pub fn media_urls(&self) -> Vec<String> {
        self.messages
            .iter()
            .flat_map(|m| m.media_urls())
            .map(str::to_string)
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One row of the conversation list, scoped to the requesting user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: Uuid,
    /// The other participant (the requester is stripped)
    pub participants: Vec<UserSummary>,
    pub last_message: Option<ChatMessage>,
    pub updated_at: DateTime<Utc>,
    pub archived: bool,
}

/// Query parameters for listing conversations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListConversationsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// `"true"` selects the archived view
    pub archive: Option<String>,
}

impl ListConversationsParams {
    pub fn archived(&self) -> bool {
        self.archive.as_deref() == Some("true")
    }
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConversationsResponse {
    pub chats: Vec<ConversationSummary>,
    pub page: u32,
    pub total_pages: u64,
    pub has_next_page: bool,
}

/// Query parameters for paging through a conversation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationPageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A conversation with one user and a window of its messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPage {
    pub chat_id: Uuid,
    pub archived: bool,
    pub participants: Vec<UserSummary>,
    /// Oldest first within the window
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
}

/// Response after deleting a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConversationResponse {
    pub message: String,
    pub chat_id: Uuid,
    /// The document was removed because both sides deleted it
    pub permanent: bool,
}

/// Request body of the archive toggle
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleArchiveRequest {
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
}

/// Response after toggling the archive marker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleArchiveResponse {
    pub message: String,
    pub chat_id: Uuid,
    pub archived: bool,
    pub recipient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadTotalResponse {
    pub total_unread_messages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: usize,
}

/// Response after marking a whole conversation as read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub message: String,
    pub chat_id: Uuid,
    pub count: usize,
}
