//! Presence Store
//!
//! One row per user, upserted on every connect and disconnect and never deleted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::shared::messaging::Presence;

#[async_trait]
pub trait PresenceStore: Send + Sync {
    async fn upsert(&self, presence: &Presence) -> BackendResult<()>;

    async fn get(&self, user: Uuid) -> BackendResult<Option<Presence>>;
}

#[derive(Clone, Default)]
pub struct MemoryPresenceStore {
    entries: Arc<RwLock<HashMap<Uuid, Presence>>>,
}

impl MemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceStore for MemoryPresenceStore {
    async fn upsert(&self, presence: &Presence) -> BackendResult<()> {
        self.entries.write().await.insert(presence.user_id, presence.clone());
        Ok(())
    }

    async fn get(&self, user: Uuid) -> BackendResult<Option<Presence>> {
        Ok(self.entries.read().await.get(&user).cloned())
    }
}

/// Presence backed by the `user_status` table
#[derive(Clone)]
pub struct PgPresenceStore {
    pool: PgPool,
}

impl PgPresenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceStore for PgPresenceStore {
    async fn upsert(&self, presence: &Presence) -> BackendResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_status (user_id, is_online, last_seen, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                is_online = EXCLUDED.is_online,
                last_seen = EXCLUDED.last_seen,
                updated_at = NOW()
            "#,
        )
        .bind(presence.user_id)
        .bind(presence.is_online)
        .bind(presence.last_seen)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, user: Uuid) -> BackendResult<Option<Presence>> {
        let row: Option<(Uuid, bool, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT user_id, is_online, last_seen FROM user_status WHERE user_id = $1")
                .bind(user)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(user_id, is_online, last_seen)| Presence {
            user_id,
            is_online,
            last_seen,
        }))
    }
}
