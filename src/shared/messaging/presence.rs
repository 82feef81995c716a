//! Presence Data Structures
//!
//! One online flag plus last-seen timestamp per user, and the payload pushed
//! to friends when it changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored presence of one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub user_id: Uuid,
    pub is_online: bool,
    /// `None` while online
    pub last_seen: Option<DateTime<Utc>>,
}

impl Presence {
    pub fn online(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_online: true,
            last_seen: None,
        }
    }

    pub fn offline(user_id: Uuid, last_seen: DateTime<Utc>) -> Self {
        Self {
            user_id,
            is_online: false,
            last_seen: Some(last_seen),
        }
    }
}

/// Display data sent along with an "online" update
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceIdentity {
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

/// Payload of the `friend-online-status` event.
///
/// Connect updates carry `name`/`profileImage`; disconnect updates do not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    pub user_id: Uuid,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub identity: Option<PresenceIdentity>,
}

impl PresenceUpdate {
    pub fn connected(presence: &Presence, identity: PresenceIdentity) -> Self {
        Self {
            user_id: presence.user_id,
            is_online: presence.is_online,
            last_seen: presence.last_seen,
            identity: Some(identity),
        }
    }

    pub fn disconnected(presence: &Presence) -> Self {
        Self {
            user_id: presence.user_id,
            is_online: presence.is_online,
            last_seen: presence.last_seen,
            identity: None,
        }
    }
}
