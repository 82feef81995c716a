//! User Data Structures
//!
//! Read-only views of the user directory as the chat subsystem consumes them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as stored in the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub profile_image: Option<String>,
    /// Opaque push-subscription handle, forwarded as-is to the push gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_subscription: Option<serde_json::Value>,
}

impl UserProfile {
    pub fn new(id: Uuid, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            profile_image: None,
            push_subscription: None,
        }
    }

    /// "First Last", or whichever half is present
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Public fields of a participant, as shown in chat lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
}

impl UserSummary {
    /// Summary for a user the directory no longer knows
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            profile_image: None,
        }
    }
}

impl From<&UserProfile> for UserSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            first_name: Some(profile.first_name.clone()),
            last_name: Some(profile.last_name.clone()),
            profile_image: profile.profile_image.clone(),
        }
    }
}
