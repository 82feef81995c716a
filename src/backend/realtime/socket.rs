/**
 * WebSocket Transport
 *
 * `GET /socket?userId&name&profileImage` upgrades an authenticated request.
 * On connect the user joins their room and friends are told they are online;
 * on disconnect friends are told they went offline.
 *
 * # Frames
 *
 * Server to client: every event emitted to the user's room, serialized as
 * `{"event", "data", "timestamp"}`.
 *
 * Client to server: `{"event": "newMessage" | "messageDeleted", "data": {..., "targetUserId"}}`
 * is relayed as-is to the target's room. Anything else is ignored.
 */

use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use super::hub::RealtimeHub;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::presence::PresenceService;
use crate::shared::messaging::PresenceIdentity;
use crate::shared::{ClientFrame, RealtimeEvent, SharedError};

/// Handshake query of the socket
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketParams {
    /// Must match the session user when given
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

pub async fn socket_handler(
    ws: WebSocketUpgrade,
    user: AuthUser,
    State(presence): State<PresenceService>,
    State(hub): State<RealtimeHub>,
    query: Result<Query<SocketParams>, QueryRejection>,
) -> BackendResult<Response> {
    let Query(params) = query?;
    let user_id = user.id();

    if params.user_id.is_some_and(|claimed| claimed != user_id) {
        tracing::warn!("[Realtime] {} tried to connect as {:?}", user_id, params.user_id);
        return Err(SharedError::forbidden("userId does not match the session").into());
    }

    let identity = PresenceIdentity {
        name: params.name,
        profile_image: params.profile_image,
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user_id, identity, presence, hub)))
}

async fn handle_socket(
    socket: WebSocket,
    user_id: Uuid,
    identity: PresenceIdentity,
    presence: PresenceService,
    hub: RealtimeHub,
) {
    let mut events = presence.on_connect(user_id, identity).await;
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] {} lagged, skipped {} events", user_id, skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Realtime] Failed to serialize {}: {}", event.event.as_str(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let relay_hub = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    relay_frame(&relay_hub, user_id, text.as_str());
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    presence.on_disconnect(user_id).await;
}

/// Relay a client frame to its target's room. Returns how many connections got it.
pub fn relay_frame(hub: &RealtimeHub, from: Uuid, raw: &str) -> usize {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!("[Realtime] Unreadable frame from {}: {}", from, e);
            return 0;
        }
    };

    if !frame.event.is_relayable() {
        tracing::debug!("[Realtime] {} may not relay {}", from, frame.event.as_str());
        return 0;
    }
    let Some(target) = frame.target_user_id() else {
        tracing::debug!("[Realtime] {} frame from {} has no targetUserId", frame.event.as_str(), from);
        return 0;
    };

    hub.emit(target, RealtimeEvent::new(frame.event, frame.data))
}
