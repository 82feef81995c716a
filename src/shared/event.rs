/**
 * Real-time Event System
 *
 * This module defines the frames exchanged over the per-user realtime
 * channel. Every frame is `{"event": <name>, "data": <payload>, "timestamp": ...}`.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::messaging::PresenceUpdate;

/// Type of real-time event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A message was sent to the receiving user
    #[serde(rename = "newMessage")]
    NewMessage,
    /// A message the receiving user can see was deleted
    #[serde(rename = "messageDeleted")]
    MessageDeleted,
    /// A friend went online or offline
    #[serde(rename = "friend-online-status")]
    FriendOnlineStatus,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NewMessage => "newMessage",
            EventType::MessageDeleted => "messageDeleted",
            EventType::FriendOnlineStatus => "friend-online-status",
        }
    }

    /// Events a client may ask the server to relay to another user
    pub fn is_relayable(&self) -> bool {
        matches!(self, EventType::NewMessage | EventType::MessageDeleted)
    }
}

/// Real-time event delivered to one user's room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event: EventType,
    /// Event payload (JSON-serializable data)
    pub data: serde_json::Value,
    /// Timestamp when event occurred
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event: EventType, data: serde_json::Value) -> Self {
        Self {
            event,
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a `newMessage` event
    pub fn new_message(data: serde_json::Value) -> Self {
        Self::new(EventType::NewMessage, data)
    }

    /// Create a `messageDeleted` event
    pub fn message_deleted(data: serde_json::Value) -> Self {
        Self::new(EventType::MessageDeleted, data)
    }

    /// Create a `friend-online-status` event
    pub fn presence(update: &PresenceUpdate) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::FriendOnlineStatus, serde_json::to_value(update)?))
    }
}

/// A frame sent by a client over its socket
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub event: EventType,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ClientFrame {
    /// The room this frame should be relayed to (`data.targetUserId`)
    pub fn target_user_id(&self) -> Option<Uuid> {
        self.data
            .get("targetUserId")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}
