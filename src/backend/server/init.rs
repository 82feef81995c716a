/**
 * Server Initialization
 *
 * Builds the application state from a loaded `AppConfig` and hands it to the
 * router.
 *
 * # Initialization Process
 *
 * 1. Connect the optional database and run migrations
 * 2. Pick the store implementations: PostgreSQL when a pool exists, memory otherwise
 * 3. Create the media store and the push dispatcher
 * 4. Build the chat and presence services around one realtime hub
 * 5. Start the periodic room cleanup and create the router
 */

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;

use crate::backend::chat::{ChatService, ChatSettings, ConversationStore, MemoryConversationStore, PgConversationStore};
use crate::backend::directory::{
    FriendGraph, MemoryFriendGraph, MemoryUserDirectory, PgFriendGraph, PgUserDirectory, UserDirectory,
};
use crate::backend::error::BackendResult;
use crate::backend::media::LocalMediaStore;
use crate::backend::presence::{MemoryPresenceStore, PgPresenceStore, PresenceService, PresenceStore};
use crate::backend::push::{HttpPushDispatcher, NoopPushDispatcher, PushDispatcher};
use crate::backend::realtime::RealtimeHub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// How often empty realtime rooms are dropped
pub const ROOM_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// The store implementations behind the services
#[derive(Clone)]
pub struct Stores {
    pub conversations: Arc<dyn ConversationStore>,
    pub users: Arc<dyn UserDirectory>,
    pub friends: Arc<dyn FriendGraph>,
    pub presence: Arc<dyn PresenceStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            conversations: Arc::new(PgConversationStore::new(pool.clone())),
            users: Arc::new(PgUserDirectory::new(pool.clone())),
            friends: Arc::new(PgFriendGraph::new(pool.clone())),
            presence: Arc::new(PgPresenceStore::new(pool)),
        }
    }

    /// In-memory stores. The directory and friend graph are passed in so the
    /// caller can keep seeding them.
    pub fn memory(users: MemoryUserDirectory, friends: MemoryFriendGraph) -> Self {
        Self {
            conversations: Arc::new(MemoryConversationStore::new()),
            users: Arc::new(users),
            friends: Arc::new(friends),
            presence: Arc::new(MemoryPresenceStore::new()),
        }
    }
}

/// Create and configure the Axum application
///
/// A missing or unreachable database is not fatal: the server falls back to
/// in-memory stores. A media root that cannot be created is.
pub async fn create_app(config: AppConfig) -> BackendResult<Router<()>> {
    tracing::info!("Initializing {} chat server", config.app_name);

    let db_pool = load_database(&config).await;
    let stores = match db_pool.clone() {
        Some(pool) => Stores::postgres(pool),
        None => Stores::memory(MemoryUserDirectory::new(), MemoryFriendGraph::new()),
    };

    let app_state = build_state(config, stores, db_pool).await?;
    let app = create_router(app_state.clone());

    let hub = app_state.hub.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ROOM_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = hub.cleanup_inactive_rooms();
            tracing::debug!("[Realtime] Cleaned up {} inactive rooms", removed);
        }
    });

    tracing::info!("Router configured with periodic cleanup task");

    Ok(app)
}

/// Wire the services over the given stores
pub async fn build_state(config: AppConfig, stores: Stores, db_pool: Option<PgPool>) -> BackendResult<AppState> {
    let media = LocalMediaStore::new(config.media_root.clone(), config.media_public_url.clone()).await?;

    let push: Arc<dyn PushDispatcher> = match config.push_gateway_url.as_deref() {
        Some(endpoint) => {
            tracing::info!("[Push] Delivering notifications through {}", endpoint);
            Arc::new(HttpPushDispatcher::new(endpoint))
        }
        None => {
            tracing::warn!("[Push] PUSH_GATEWAY_URL not set. Push notifications are disabled.");
            Arc::new(NoopPushDispatcher)
        }
    };

    let hub = RealtimeHub::new();
    let chat = ChatService::new(
        stores.conversations,
        stores.users.clone(),
        Arc::new(media),
        push,
        ChatSettings {
            app_name: config.app_name.clone(),
            client_url: config.client_url.clone(),
        },
    );
    let presence = PresenceService::new(stores.presence, stores.friends, hub.clone());

    Ok(AppState {
        config: Arc::new(config),
        chat,
        presence,
        hub,
        users: stores.users,
        db_pool,
    })
}
