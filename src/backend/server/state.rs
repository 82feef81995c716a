/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds the services behind the routes:
 * - `ChatService` for every `/chat` operation
 * - `PresenceService` for socket connect/disconnect
 * - `RealtimeHub`, the per-user rooms both of them push into
 * - the user directory, used by the auth middleware
 * - the optional database pool
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and `Send + Sync`: services keep their
 * collaborators behind `Arc<dyn Trait>`, the hub keeps its rooms behind a
 * mutex.
 *
 * # Example
 *
 * ```rust,ignore
 * use huddle::backend::chat::ChatService;
 * use axum::extract::State;
 *
 * async fn handler(State(chat): State<ChatService>) {
 *     // ...
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::chat::ChatService;
use crate::backend::directory::UserDirectory;
use crate::backend::presence::PresenceService;
use crate::backend::realtime::RealtimeHub;
use crate::shared::AppConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<AppConfig>,

    /// Message lifecycle, visibility and read-state
    pub chat: ChatService,

    /// Online/offline bookkeeping and friend fan-out
    pub presence: PresenceService,

    /// Per-user realtime rooms
    ///
    /// HTTP handlers emit `newMessage`/`messageDeleted` here; sockets
    /// subscribe to it.
    pub hub: RealtimeHub,

    /// Identity lookups for the auth middleware
    pub users: Arc<dyn UserDirectory>,

    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is not configured; the stores are then
    /// in-memory.
    pub db_pool: Option<PgPool>,
}

impl FromRef<AppState> for ChatService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}

impl FromRef<AppState> for PresenceService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for RealtimeHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

/// Implement FromRef for Option<PgPool>
///
/// Lets the health check report whether persistence is on.
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
