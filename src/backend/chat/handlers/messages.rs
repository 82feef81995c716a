/**
 * Message Handlers
 *
 * - `POST /chat/send` - multipart send with attachments
 * - `POST /chat/message` - delete one message for self or for everyone
 * - `POST /chat/message/read` - mark listed messages as read
 * - `GET /chat/lastMessage/{chatId}` - last message visible to the caller
 *
 * Successful sends and for-everyone deletions are also pushed to the other
 * participant's realtime room.
 */

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
        Multipart, Path, State,
    },
    Json,
};
use uuid::Uuid;

use crate::backend::chat::service::{ChatService, OutgoingMessage};
use crate::backend::error::BackendResult;
use crate::backend::media::MediaUpload;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::RealtimeHub;
use crate::shared::messaging::{
    DeleteMessageRequest, DeleteMessageResponse, LastMessageResponse, MarkReadRequest,
    MarkReadResponse, SendMessageResponse,
};
use crate::shared::{RealtimeEvent, SharedError};

/// Read the multipart form of a send: `recipientId`, `text`, `clientId` and
/// any number of file parts.
async fn read_send_form(multipart: &mut Multipart) -> BackendResult<OutgoingMessage> {
    let mut recipient = None;
    let mut text = String::new();
    let mut client_id = None;
    let mut attachments = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "recipientId" => recipient = Some(field.text().await?),
            "text" => text = field.text().await?,
            "clientId" => client_id = Some(field.text().await?).filter(|id| !id.is_empty()),
            _ if field.file_name().is_some() || name == "files" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                attachments.push(MediaUpload::new(file_name, content_type, bytes));
            }
            other => tracing::debug!("[Chat] Ignoring form field {:?}", other),
        }
    }

    let recipient_id = recipient
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SharedError::validation("recipientId", "Please provide a recipient"))
        .and_then(|id| {
            Uuid::parse_str(id).map_err(|_| SharedError::validation("recipientId", "Invalid recipient ID"))
        })?;

    Ok(OutgoingMessage {
        recipient_id,
        text,
        attachments,
        client_id,
    })
}

pub async fn send_message(
    user: AuthUser,
    State(chat): State<ChatService>,
    State(hub): State<RealtimeHub>,
    multipart: Result<Multipart, MultipartRejection>,
) -> BackendResult<Json<SendMessageResponse>> {
    let mut multipart = multipart?;
    let outgoing = read_send_form(&mut multipart).await?;
    let sent = chat.send_message(user.id(), outgoing).await?;

    let response = SendMessageResponse {
        message: "Message sent successfully".to_string(),
        new_message: sent.message,
        recipient_id: sent.recipient_id,
        chat_id: sent.chat_id,
        client_id: sent.client_id,
    };

    hub.emit(response.recipient_id, RealtimeEvent::new_message(serde_json::to_value(&response)?));

    Ok(Json(response))
}

pub async fn delete_message(
    user: AuthUser,
    State(chat): State<ChatService>,
    State(hub): State<RealtimeHub>,
    payload: Result<Json<DeleteMessageRequest>, JsonRejection>,
) -> BackendResult<Json<DeleteMessageResponse>> {
    let Json(request) = payload?;
    let deletion = chat
        .delete_message(user.id(), request.chat_id, request.message_id, request.delete_for)
        .await?;

    let response = DeleteMessageResponse {
        message: "Message deletion processed successfully".to_string(),
        deleted_message_id: deletion.message_id,
        recipient_id: request.recipient_id.or(Some(deletion.peer_id)),
        delete_for_everyone: deletion.for_everyone,
    };

    // a self-only deletion does not change what the peer sees
    if deletion.for_everyone {
        let mut data = serde_json::to_value(&response)?;
        data["chatId"] = serde_json::json!(deletion.chat_id);
        hub.emit(deletion.peer_id, RealtimeEvent::message_deleted(data));
    }

    Ok(Json(response))
}

pub async fn mark_read_by_ids(
    user: AuthUser,
    State(chat): State<ChatService>,
    payload: Result<Json<MarkReadRequest>, JsonRejection>,
) -> BackendResult<Json<MarkReadResponse>> {
    let Json(request) = payload?;
    let count = chat
        .mark_read_by_ids(user.id(), request.chat_id, &request.message_ids)
        .await?;

    Ok(Json(MarkReadResponse {
        message: format!("{} messages marked as read", count),
        count,
    }))
}

pub async fn last_message(
    user: AuthUser,
    State(chat): State<ChatService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> BackendResult<Json<LastMessageResponse>> {
    let Path(chat_id) = path?;
    let last_message = chat.last_message(user.id(), chat_id).await?;
    Ok(Json(LastMessageResponse { last_message }))
}
