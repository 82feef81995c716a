/**
 * Presence & Fan-out
 *
 * Socket connect and disconnect flip the user's presence and tell every
 * accepted friend about it through the friend's realtime room.
 *
 * # Payloads
 *
 * - connect: `{userId, isOnline: true, lastSeen: null, name, profileImage}`
 * - disconnect: `{userId, isOnline: false, lastSeen}`, without identity fields
 *
 * Nothing here fails the socket: store and graph errors are logged.
 */

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::store::PresenceStore;
use crate::backend::directory::FriendGraph;
use crate::backend::error::BackendResult;
use crate::backend::realtime::RealtimeHub;
use crate::shared::messaging::{Presence, PresenceIdentity, PresenceUpdate};
use crate::shared::RealtimeEvent;

#[derive(Clone)]
pub struct PresenceService {
    store: Arc<dyn PresenceStore>,
    friends: Arc<dyn FriendGraph>,
    hub: RealtimeHub,
}

impl PresenceService {
    pub fn new(store: Arc<dyn PresenceStore>, friends: Arc<dyn FriendGraph>, hub: RealtimeHub) -> Self {
        Self { store, friends, hub }
    }

    /// Join the user's room, mark them online and notify their friends.
    ///
    /// The returned receiver is the connection's subscription to its room.
    pub async fn on_connect(&self, user: Uuid, identity: PresenceIdentity) -> broadcast::Receiver<RealtimeEvent> {
        let receiver = self.hub.join(user);
        tracing::info!("[Presence] {} connected", user);

        if let Err(e) = self.publish_online(user, identity).await {
            tracing::warn!("[Presence] Failed to publish online status of {}: {}", user, e);
        }
        receiver
    }

    /// Mark the user offline and notify their friends
    pub async fn on_disconnect(&self, user: Uuid) {
        tracing::info!("[Presence] {} disconnected", user);

        if let Err(e) = self.publish_offline(user).await {
            tracing::warn!("[Presence] Failed to publish offline status of {}: {}", user, e);
        }
    }

    /// Returns how many friends were notified
    pub async fn publish_online(&self, user: Uuid, identity: PresenceIdentity) -> BackendResult<usize> {
        let presence = Presence::online(user);
        self.store.upsert(&presence).await?;
        self.fan_out(user, &PresenceUpdate::connected(&presence, identity)).await
    }

    /// Returns how many friends were notified
    pub async fn publish_offline(&self, user: Uuid) -> BackendResult<usize> {
        let presence = Presence::offline(user, Utc::now());
        self.store.upsert(&presence).await?;
        self.fan_out(user, &PresenceUpdate::disconnected(&presence)).await
    }

    pub async fn presence_of(&self, user: Uuid) -> BackendResult<Option<Presence>> {
        self.store.get(user).await
    }

    async fn fan_out(&self, user: Uuid, update: &PresenceUpdate) -> BackendResult<usize> {
        let event = RealtimeEvent::presence(update)?;
        let friends = self.friends.accepted_friends(user).await?;

        for friend in &friends {
            self.hub.emit(*friend, event.clone());
        }
        tracing::debug!(
            "[Presence] {} is {}, told {} friends",
            user,
            if update.is_online { "online" } else { "offline" },
            friends.len()
        );
        Ok(friends.len())
    }
}
