//! Conversation Store
//!
//! Conversations are persisted document-style: one record per pair holding the
//! whole message list. Every method is atomic for a single conversation; there
//! is no cross-document transaction.
//!
//! Read-modify-write goes through [`ConversationStore::update`], which holds
//! the document exclusively while the change runs. A plain `find` followed by
//! a write would lose messages appended in between.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::messaging::{ChatMessage, Conversation, PageRequest, Participants};

/// Which messages a read-state update targets
#[derive(Debug, Clone, Copy)]
pub enum ReadScope<'a> {
    /// Every message in the conversation
    All,
    /// Only the listed message ids
    Ids(&'a [Uuid]),
}

/// What [`ConversationStore::update`] does with the document once the change ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBack {
    /// Nothing changed, write nothing
    Keep,
    /// Persist the changed document and bump `updated_at`
    Save,
    /// Remove the document
    Remove,
}

/// A change applied to one conversation while the store holds it exclusively.
/// Returning an error aborts the update with nothing written.
pub type ConversationChange<'a> = dyn FnMut(&mut Conversation) -> BackendResult<WriteBack> + Send + 'a;

/// Persistence of two-party conversation documents
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn find(&self, id: Uuid) -> BackendResult<Option<Conversation>>;

    async fn find_between(&self, participants: Participants) -> BackendResult<Option<Conversation>>;

    /// Return the pair's conversation, creating an empty one if there is none.
    /// Concurrent callers for the same pair observe the same document.
    async fn find_or_create(&self, participants: Participants) -> BackendResult<Conversation>;

    /// Append a message, lift `restore_for`'s soft delete and bump
    /// `updated_at`, all in one step. Returns the updated document.
    async fn append_message(
        &self,
        id: Uuid,
        message: &ChatMessage,
        restore_for: Uuid,
    ) -> BackendResult<Conversation>;

    /// Run `change` against the current document with no other writer in
    /// between, then apply its [`WriteBack`]. Returns the document as the
    /// change left it (for `Remove`, as it was just before removal), or `None`
    /// if there is no such conversation.
    async fn update(&self, id: Uuid, change: &mut ConversationChange<'_>) -> BackendResult<Option<Conversation>>;

    /// One page of the conversations `user` can see in the archived or the
    /// main view, most recently updated first, plus the total match count.
    async fn list_for_user(
        &self,
        user: Uuid,
        archived: bool,
        page: PageRequest,
    ) -> BackendResult<(Vec<Conversation>, u64)>;

    /// Every conversation `user` takes part in, including soft-deleted ones
    async fn list_all_for_user(&self, user: Uuid) -> BackendResult<Vec<Conversation>>;

    /// Count-and-flip in one step: mark the scoped messages not sent by
    /// `reader` as read and return how many flipped. `None` if the
    /// conversation does not exist.
    async fn mark_read(&self, id: Uuid, reader: Uuid, scope: ReadScope<'_>) -> BackendResult<Option<usize>>;
}

/// In-memory conversation store, used when no database is configured and in tests
#[derive(Clone, Default)]
pub struct MemoryConversationStore {
    conversations: Arc<RwLock<HashMap<Uuid, Conversation>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn newest_first(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn find(&self, id: Uuid) -> BackendResult<Option<Conversation>> {
        Ok(self.conversations.read().await.get(&id).cloned())
    }

    async fn find_between(&self, participants: Participants) -> BackendResult<Option<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .values()
            .find(|c| c.participants == participants)
            .cloned())
    }

    async fn find_or_create(&self, participants: Participants) -> BackendResult<Conversation> {
        let mut conversations = self.conversations.write().await;
        if let Some(existing) = conversations.values().find(|c| c.participants == participants) {
            return Ok(existing.clone());
        }
        let conversation = Conversation::new(participants);
        conversations.insert(conversation.id, conversation.clone());
        tracing::debug!("[Chat] Created conversation {}", conversation.id);
        Ok(conversation)
    }

    async fn append_message(
        &self,
        id: Uuid,
        message: &ChatMessage,
        restore_for: Uuid,
    ) -> BackendResult<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&id)
            .ok_or_else(|| BackendError::not_found("Chat"))?;
        conversation.restore_for(restore_for);
        conversation.messages.push(message.clone());
        conversation.touch();
        Ok(conversation.clone())
    }

    async fn update(&self, id: Uuid, change: &mut ConversationChange<'_>) -> BackendResult<Option<Conversation>> {
        let mut conversations = self.conversations.write().await;
        let Some(stored) = conversations.get_mut(&id) else {
            return Ok(None);
        };

        // Work on a copy so a failed change leaves the stored document as it was
        let mut draft = stored.clone();
        match change(&mut draft)? {
            WriteBack::Keep => {}
            WriteBack::Save => {
                draft.touch();
                *stored = draft.clone();
            }
            WriteBack::Remove => {
                conversations.remove(&id);
                tracing::debug!("[Chat] Removed conversation {}", id);
            }
        }
        Ok(Some(draft))
    }

    async fn list_for_user(
        &self,
        user: Uuid,
        archived: bool,
        page: PageRequest,
    ) -> BackendResult<(Vec<Conversation>, u64)> {
        let conversations = self.conversations.read().await;
        let mut matching: Vec<Conversation> = conversations
            .values()
            .filter(|c| c.is_visible_to(user) && c.is_archived_for(user) == archived)
            .cloned()
            .collect();
        newest_first(&mut matching);

        let total = matching.len() as u64;
        let page_items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn list_all_for_user(&self, user: Uuid) -> BackendResult<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .values()
            .filter(|c| c.has_participant(user))
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid, reader: Uuid, scope: ReadScope<'_>) -> BackendResult<Option<usize>> {
        let mut conversations = self.conversations.write().await;
        let Some(conversation) = conversations.get_mut(&id) else {
            return Ok(None);
        };
        let flipped = match scope {
            ReadScope::All => conversation.mark_all_read(reader),
            ReadScope::Ids(ids) => conversation.mark_read_by_ids(reader, ids),
        };
        if flipped > 0 {
            conversation.touch();
        }
        Ok(Some(flipped))
    }
}
