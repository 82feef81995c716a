/**
 * Conversation Handlers
 *
 * - `GET /chat` - the caller's conversation list (main or archived view)
 * - `GET /chat/{userId}` - open the conversation with a user, one page of history
 * - `DELETE /chat/{chatId}` - delete the conversation for the caller
 * - `PATCH /chat/archive/{chatId}` - toggle the caller's archive marker
 * - `GET /chat/unread/total`, `GET /chat/unread/{chatId}` - unread counters
 * - `PATCH /chat/read/{chatId}` - mark the whole conversation as read
 */

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::chat::service::ChatService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::shared::messaging::{
    ConversationPage, ConversationPageParams, DeleteConversationResponse, ListConversationsParams,
    ListConversationsResponse, MarkAllReadResponse, ToggleArchiveRequest, ToggleArchiveResponse,
    UnreadCountResponse, UnreadTotalResponse,
};
use crate::shared::SharedError;

pub async fn list_conversations(
    user: AuthUser,
    State(chat): State<ChatService>,
    query: Result<Query<ListConversationsParams>, QueryRejection>,
) -> BackendResult<Json<ListConversationsResponse>> {
    let Query(params) = query?;
    Ok(Json(chat.list_conversations(user.id(), &params).await?))
}

pub async fn conversation_with_user(
    user: AuthUser,
    State(chat): State<ChatService>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ConversationPageParams>, QueryRejection>,
) -> BackendResult<Json<ConversationPage>> {
    let Path(peer) = path?;
    let Query(params) = query?;
    Ok(Json(chat.conversation_with(user.id(), peer, &params).await?))
}

pub async fn delete_conversation(
    user: AuthUser,
    State(chat): State<ChatService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> BackendResult<Json<DeleteConversationResponse>> {
    let Path(chat_id) = path?;
    let permanent = chat.delete_conversation(user.id(), chat_id).await?;

    let message = if permanent {
        "Chat and associated media deleted permanently"
    } else {
        "Chat deleted for you"
    };
    Ok(Json(DeleteConversationResponse {
        message: message.to_string(),
        chat_id,
        permanent,
    }))
}

/// The body is optional; when present it may carry `recipientId`, which is echoed back.
pub async fn toggle_archive(
    user: AuthUser,
    State(chat): State<ChatService>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> BackendResult<Json<ToggleArchiveResponse>> {
    let Path(chat_id) = path?;
    let request: ToggleArchiveRequest = if body.is_empty() {
        ToggleArchiveRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| SharedError::validation("body", e.to_string()))?
    };

    let archived = chat.toggle_archive(user.id(), chat_id).await?;
    Ok(Json(ToggleArchiveResponse {
        message: format!("Chat {} successfully", if archived { "archived" } else { "unarchived" }),
        chat_id,
        archived,
        recipient_id: request.recipient_id,
    }))
}

pub async fn unread_total(
    user: AuthUser,
    State(chat): State<ChatService>,
) -> BackendResult<Json<UnreadTotalResponse>> {
    Ok(Json(UnreadTotalResponse {
        total_unread_messages: chat.count_unread_total(user.id()).await?,
    }))
}

pub async fn unread_for_conversation(
    user: AuthUser,
    State(chat): State<ChatService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> BackendResult<Json<UnreadCountResponse>> {
    let Path(chat_id) = path?;
    Ok(Json(UnreadCountResponse {
        unread_count: chat.count_unread(user.id(), chat_id).await?,
    }))
}

pub async fn mark_all_read(
    user: AuthUser,
    State(chat): State<ChatService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> BackendResult<Json<MarkAllReadResponse>> {
    let Path(chat_id) = path?;
    let count = chat.mark_all_read(user.id(), chat_id).await?;
    Ok(Json(MarkAllReadResponse {
        message: "All messages marked as read successfully".to_string(),
        chat_id,
        count,
    }))
}
