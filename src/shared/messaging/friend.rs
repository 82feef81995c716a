//! Friend Edge Data Structure
//!
//! Friendships are owned by the friend graph; the chat subsystem only reads
//! accepted edges to find presence fan-out targets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a friend edge
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    /// Request is pending
    #[default]
    Pending,
    /// Request was accepted
    Accepted,
}

impl FriendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendStatus::Pending => "pending",
            FriendStatus::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(FriendStatus::Pending),
            "accepted" => Some(FriendStatus::Accepted),
            _ => None,
        }
    }
}

/// Represents a friendship between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendEdge {
    /// User who sent the request
    pub requester: Uuid,
    /// User who received the request
    pub recipient: Uuid,
    #[serde(default)]
    pub status: FriendStatus,
}

impl FriendEdge {
    pub fn accepted(requester: Uuid, recipient: Uuid) -> Self {
        Self {
            requester,
            recipient,
            status: FriendStatus::Accepted,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == FriendStatus::Accepted
    }

    /// The party of this edge that is not `user`
    pub fn other_party(&self, user: Uuid) -> Option<Uuid> {
        if self.requester == user {
            Some(self.recipient)
        } else if self.recipient == user {
            Some(self.requester)
        } else {
            None
        }
    }
}
