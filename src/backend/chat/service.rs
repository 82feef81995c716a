/**
 * Chat Service
 *
 * Message lifecycle, per-user visibility, archive markers and read-state for
 * two-party conversations.
 *
 * # Sending
 *
 * A send is a small saga with no transaction around it:
 *
 * 1. classify every attachment by MIME type (nothing is uploaded yet)
 * 2. upload the attachments one by one
 * 3. append the message in a single store write
 *
 * If step 2 or 3 fails, everything uploaded during this call is removed
 * again before the error is returned. The push notification afterwards is
 * best-effort.
 *
 * # Deleting and archiving
 *
 * Every read-modify-write runs inside `ConversationStore::update`, so a
 * message appended concurrently is never dropped by a stale write. Media of a
 * removed message or conversation is purged once the removal is committed.
 * Purge failures are logged; they never undo the deletion.
 */

use std::sync::Arc;

use uuid::Uuid;

use super::store::{ConversationStore, ReadScope, WriteBack};
use crate::backend::directory::UserDirectory;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::media::{MediaStore, MediaUpload};
use crate::backend::push::{PushDispatcher, PushNotification};
use crate::shared::messaging::{
    message_window, ChatMessage, Conversation, ConversationPage, ConversationPageParams,
    ConversationSummary, DeleteMode, ListConversationsParams, ListConversationsResponse, MediaItem,
    MediaKind, PageRequest, Participants, UserProfile, UserSummary,
};
use crate::shared::SharedError;

/// Conversations per page when the client gives no limit
pub const DEFAULT_LIST_LIMIT: u32 = 10;
/// Messages per page when the client gives no limit
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Values the service needs from the application config
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Title of push notifications
    pub app_name: String,
    /// Base URL of the web client, for notification links
    pub client_url: String,
}

/// Input of [`ChatService::send_message`]
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub recipient_id: Uuid,
    pub text: String,
    pub attachments: Vec<MediaUpload>,
    /// Opaque client correlation id, echoed back
    pub client_id: Option<String>,
}

/// A stored message and where it went
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: Uuid,
    pub recipient_id: Uuid,
    pub message: ChatMessage,
    pub client_id: Option<String>,
}

/// Outcome of [`ChatService::delete_message`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDeletion {
    pub chat_id: Uuid,
    pub message_id: Uuid,
    /// The other participant
    pub peer_id: Uuid,
    pub for_everyone: bool,
    /// The message was physically removed
    pub removed: bool,
}

#[derive(Clone)]
pub struct ChatService {
    conversations: Arc<dyn ConversationStore>,
    users: Arc<dyn UserDirectory>,
    media: Arc<dyn MediaStore>,
    push: Arc<dyn PushDispatcher>,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        users: Arc<dyn UserDirectory>,
        media: Arc<dyn MediaStore>,
        push: Arc<dyn PushDispatcher>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            conversations,
            users,
            media,
            push,
            settings,
        }
    }

    pub async fn send_message(&self, sender: Uuid, outgoing: OutgoingMessage) -> BackendResult<SentMessage> {
        let OutgoingMessage {
            recipient_id,
            text,
            attachments,
            client_id,
        } = outgoing;

        if text.trim().is_empty() && attachments.is_empty() {
            return Err(SharedError::validation("text", "Please provide text or media").into());
        }

        let participants = Participants::new(sender, recipient_id)?;
        let recipient = self
            .users
            .find_user(recipient_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Recipient"))?;

        let kinds = attachments
            .iter()
            .map(|upload| {
                MediaKind::from_mime(&upload.content_type).ok_or_else(|| {
                    SharedError::validation(
                        "files",
                        format!("Unsupported media type: {}", upload.content_type),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let conversation = self.conversations.find_or_create(participants).await?;

        let mut media = Vec::with_capacity(attachments.len());
        for (upload, kind) in attachments.iter().zip(kinds) {
            match self.media.upload(upload, kind).await {
                Ok(url) => media.push(MediaItem { url, kind }),
                Err(e) => {
                    tracing::warn!("[Chat] Upload failed after {} files, rolling back: {}", media.len(), e);
                    self.compensate(&media).await;
                    return Err(e);
                }
            }
        }

        let message = ChatMessage::new(sender, text, media);
        if let Err(e) = self
            .conversations
            .append_message(conversation.id, &message, recipient_id)
            .await
        {
            tracing::warn!("[Chat] Failed to store message in {}, rolling back uploads: {}", conversation.id, e);
            self.compensate(&message.media).await;
            return Err(e);
        }

        tracing::info!("[Chat] {} -> {} in {} ({} attachments)", sender, recipient_id, conversation.id, message.media.len());

        self.notify_recipient(sender, &recipient).await;

        Ok(SentMessage {
            chat_id: conversation.id,
            recipient_id,
            message,
            client_id,
        })
    }

    pub async fn delete_message(
        &self,
        actor: Uuid,
        chat_id: Uuid,
        message_id: Uuid,
        mode: DeleteMode,
    ) -> BackendResult<MessageDeletion> {
        let mut removed_media: Vec<String> = Vec::new();
        let mut removed = false;

        let mut change = |conversation: &mut Conversation| -> BackendResult<WriteBack> {
            ensure_participant(conversation, actor)?;
            let index = conversation
                .message_index(message_id)
                .ok_or_else(|| BackendError::not_found("Message"))?;

            let (changed, remove) = match mode {
                DeleteMode::Everyone => {
                    if conversation.messages[index].sender != actor {
                        return Err(SharedError::forbidden("You can only delete your own messages for everyone").into());
                    }
                    (true, true)
                }
                DeleteMode::ForSelf => {
                    let message = &mut conversation.messages[index];
                    let changed = message.hide_for(actor);
                    (changed, message.is_hidden_for_all(&conversation.participants))
                }
            };

            if remove {
                let message = conversation.messages.remove(index);
                removed_media = message.media_urls().map(str::to_string).collect();
            }
            removed = remove;
            Ok(if changed || remove { WriteBack::Save } else { WriteBack::Keep })
        };

        let conversation = self
            .conversations
            .update(chat_id, &mut change)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat"))?;
        self.purge(removed_media.iter().map(String::as_str)).await;

        tracing::debug!("[Chat] {} deleted {} ({:?}, removed: {})", actor, message_id, mode, removed);

        Ok(MessageDeletion {
            chat_id,
            message_id,
            peer_id: peer_of(&conversation, actor)?,
            for_everyone: mode == DeleteMode::Everyone,
            removed,
        })
    }

    /// Soft-delete the whole conversation for `actor`. Returns true when both
    /// sides have now deleted it and the document is gone.
    pub async fn delete_conversation(&self, actor: Uuid, chat_id: Uuid) -> BackendResult<bool> {
        let mut permanent = false;

        let mut change = |conversation: &mut Conversation| -> BackendResult<WriteBack> {
            ensure_participant(conversation, actor)?;
            conversation.hide_all_for(actor);
            permanent = conversation.is_deleted_for_all();
            Ok(if permanent { WriteBack::Remove } else { WriteBack::Save })
        };

        let conversation = self
            .conversations
            .update(chat_id, &mut change)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat"))?;

        if permanent {
            let urls = conversation.media_urls();
            self.purge(urls.iter().map(String::as_str)).await;
            tracing::info!("[Chat] Conversation {} removed permanently", chat_id);
        } else {
            tracing::debug!("[Chat] Conversation {} deleted for {}", chat_id, actor);
        }
        Ok(permanent)
    }

    pub async fn list_conversations(
        &self,
        user: Uuid,
        params: &ListConversationsParams,
    ) -> BackendResult<ListConversationsResponse> {
        let page = PageRequest::new(params.page, params.limit, DEFAULT_LIST_LIMIT);
        let (conversations, total) = self
            .conversations
            .list_for_user(user, params.archived(), page)
            .await?;

        let mut chats = Vec::with_capacity(conversations.len());
        for conversation in &conversations {
            let peer = peer_of(conversation, user)?;
            chats.push(ConversationSummary {
                id: conversation.id,
                participants: vec![self.summary_of(peer).await?],
                last_message: conversation.last_visible_message(user).cloned(),
                updated_at: conversation.updated_at,
                archived: conversation.is_archived_for(user),
            });
        }

        Ok(ListConversationsResponse {
            chats,
            page: page.page,
            total_pages: page.total_pages(total),
            has_next_page: page.has_next_page(total),
        })
    }

    /// Open (or start) the conversation with `peer` and return one page of
    /// history, newest page first.
    pub async fn conversation_with(
        &self,
        user: Uuid,
        peer: Uuid,
        params: &ConversationPageParams,
    ) -> BackendResult<ConversationPage> {
        let participants = Participants::new(user, peer)?;
        let peer_profile = self
            .users
            .find_user(peer)
            .await?
            .ok_or_else(|| BackendError::not_found("User"))?;

        let mut conversation = self.conversations.find_or_create(participants).await?;
        if !conversation.is_visible_to(user) {
            conversation = self
                .conversations
                .update(conversation.id, &mut |c: &mut Conversation| -> BackendResult<WriteBack> {
                    Ok(if c.restore_for(user) { WriteBack::Save } else { WriteBack::Keep })
                })
                .await?
                .ok_or_else(|| BackendError::not_found("Chat"))?;
        }

        let visible = conversation.visible_messages(user);
        let window = message_window(
            visible.len(),
            PageRequest::new(params.page, params.limit, DEFAULT_HISTORY_LIMIT),
        );
        let messages = visible[window.start..window.end]
            .iter()
            .map(|message| (*message).clone())
            .collect();

        Ok(ConversationPage {
            chat_id: conversation.id,
            archived: conversation.is_archived_for(user),
            participants: vec![UserSummary::from(&peer_profile)],
            messages,
            has_more: window.has_more,
        })
    }

    /// Flip `user`'s archive marker and return the new state
    pub async fn toggle_archive(&self, user: Uuid, chat_id: Uuid) -> BackendResult<bool> {
        let mut archived = false;
        self.conversations
            .update(chat_id, &mut |conversation: &mut Conversation| -> BackendResult<WriteBack> {
                ensure_participant(conversation, user)?;
                archived = conversation.toggle_archive(user);
                Ok(WriteBack::Save)
            })
            .await?
            .ok_or_else(|| BackendError::not_found("Chat"))?;
        Ok(archived)
    }

    /// Unread messages across every conversation `user` takes part in
    pub async fn count_unread_total(&self, user: Uuid) -> BackendResult<usize> {
        let conversations = self.conversations.list_all_for_user(user).await?;
        Ok(conversations.iter().map(|c| c.unread_count_for(user)).sum())
    }

    pub async fn count_unread(&self, user: Uuid, chat_id: Uuid) -> BackendResult<usize> {
        Ok(self.conversation_for(user, chat_id).await?.unread_count_for(user))
    }

    /// Returns how many messages flipped to read
    pub async fn mark_all_read(&self, user: Uuid, chat_id: Uuid) -> BackendResult<usize> {
        self.conversation_for(user, chat_id).await?;
        self.conversations
            .mark_read(chat_id, user, ReadScope::All)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat"))
    }

    /// Returns how many of the listed messages flipped to read. The caller's
    /// own messages never count.
    pub async fn mark_read_by_ids(
        &self,
        user: Uuid,
        chat_id: Option<Uuid>,
        message_ids: &[Uuid],
    ) -> BackendResult<usize> {
        let chat_id = chat_id.ok_or_else(|| SharedError::validation("chatId", "Please provide a chat ID"))?;
        if message_ids.is_empty() {
            return Err(SharedError::validation("messageIds", "Please provide an array of message IDs").into());
        }

        self.conversation_for(user, chat_id).await?;
        self.conversations
            .mark_read(chat_id, user, ReadScope::Ids(message_ids))
            .await?
            .ok_or_else(|| BackendError::not_found("Chat"))
    }

    pub async fn last_message(&self, user: Uuid, chat_id: Uuid) -> BackendResult<Option<ChatMessage>> {
        let conversation = self.conversation_for(user, chat_id).await?;
        Ok(conversation.last_visible_message(user).cloned())
    }

    /// Load a conversation `user` takes part in. Strangers get `NotFound`,
    /// the same as for a missing id.
    async fn conversation_for(&self, user: Uuid, chat_id: Uuid) -> BackendResult<Conversation> {
        let conversation = self
            .conversations
            .find(chat_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat"))?;
        ensure_participant(&conversation, user)?;
        Ok(conversation)
    }

    async fn summary_of(&self, user: Uuid) -> BackendResult<UserSummary> {
        Ok(self
            .users
            .find_user(user)
            .await?
            .map(|profile| UserSummary::from(&profile))
            .unwrap_or_else(|| UserSummary::unknown(user)))
    }

    async fn notify_recipient(&self, sender: Uuid, recipient: &UserProfile) {
        let Some(subscription) = recipient.push_subscription.as_ref() else {
            tracing::debug!("[Chat] {} has no push subscription", recipient.id);
            return;
        };

        let sender_name = match self.users.find_user(sender).await {
            Ok(Some(profile)) => profile.full_name(),
            Ok(None) => String::from("someone"),
            Err(e) => {
                tracing::warn!("[Chat] Sender lookup for push failed: {}", e);
                String::from("someone")
            }
        };

        let notification =
            PushNotification::new_message(&self.settings.app_name, &sender_name, &self.settings.client_url);
        if let Err(e) = self.push.dispatch(subscription, &notification).await {
            tracing::warn!("[Chat] Push to {} failed: {}", recipient.id, e);
        }
    }

    async fn compensate(&self, uploaded: &[MediaItem]) {
        let urls: Vec<&str> = uploaded.iter().map(|item| item.url.as_str()).collect();
        self.purge(urls).await;
    }

    async fn purge<'a>(&self, urls: impl IntoIterator<Item = &'a str>) {
        for url in urls {
            if let Err(e) = self.media.remove(url).await {
                tracing::warn!("[Chat] Failed to purge {}: {}", url, e);
            }
        }
    }
}

/// Strangers get the same answer as for a missing conversation
fn ensure_participant(conversation: &Conversation, user: Uuid) -> BackendResult<()> {
    if conversation.has_participant(user) {
        Ok(())
    } else {
        Err(BackendError::not_found("Chat"))
    }
}

fn peer_of(conversation: &Conversation, user: Uuid) -> BackendResult<Uuid> {
    conversation
        .participants
        .other(user)
        .ok_or_else(|| BackendError::not_found("Chat"))
}
