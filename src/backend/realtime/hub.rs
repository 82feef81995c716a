/**
 * Realtime Rooms
 *
 * One broadcast channel per user id. Every live socket of a user subscribes
 * to that user's channel, so emitting to a user reaches all of their
 * connections. Rooms live in this process only.
 *
 * # Delivery
 *
 * Fire-and-forget and at-most-once: emitting to a user with no live
 * connection drops the event, and a connection that falls more than
 * `ROOM_CAPACITY` events behind skips the overflow.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::RealtimeEvent;

/// Events buffered per room before slow connections start lagging
pub const ROOM_CAPACITY: usize = 100;

#[derive(Clone, Default)]
pub struct RealtimeHub {
    rooms: Arc<Mutex<HashMap<Uuid, broadcast::Sender<RealtimeEvent>>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<Uuid, broadcast::Sender<RealtimeEvent>>> {
        // a panic while holding the lock cannot leave the map half-updated
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Join `user`'s room. Dropping the receiver leaves it.
    pub fn join(&self, user: Uuid) -> broadcast::Receiver<RealtimeEvent> {
        let mut rooms = self.rooms();
        rooms
            .entry(user)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Push an event to every live connection of `user`.
    ///
    /// Returns how many connections received it.
    pub fn emit(&self, user: Uuid, event: RealtimeEvent) -> usize {
        let rooms = self.rooms();
        let Some(sender) = rooms.get(&user) else {
            tracing::debug!("[Realtime] No room for {}, dropping {}", user, event.event.as_str());
            return 0;
        };
        match sender.send(event) {
            Ok(delivered) => delivered,
            Err(err) => {
                tracing::debug!("[Realtime] Room {} has no listeners, dropping {}", user, err.0.event.as_str());
                0
            }
        }
    }

    /// Number of live connections of `user`
    pub fn connection_count(&self, user: Uuid) -> usize {
        self.rooms().get(&user).map_or(0, |sender| sender.receiver_count())
    }

    pub fn is_connected(&self, user: Uuid) -> bool {
        self.connection_count(user) > 0
    }

    /// Drop rooms that no connection listens to. Returns how many were removed.
    pub fn cleanup_inactive_rooms(&self) -> usize {
        let mut rooms = self.rooms();
        let before = rooms.len();
        rooms.retain(|_, sender| sender.receiver_count() > 0);
        before - rooms.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms().len()
    }
}
