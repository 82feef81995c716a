/**
 * Friend Graph
 *
 * Read-only view of friendships. Only accepted edges matter here: they are
 * the presence fan-out targets.
 */

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::shared::messaging::{FriendEdge, FriendStatus};

#[async_trait]
pub trait FriendGraph: Send + Sync {
    /// Users with an accepted edge to `user`, in either direction
    async fn accepted_friends(&self, user: Uuid) -> BackendResult<Vec<Uuid>>;
}

fn accepted_counterparts<'a>(edges: impl Iterator<Item = &'a FriendEdge>, user: Uuid) -> Vec<Uuid> {
    let mut friends: Vec<Uuid> = edges
        .filter(|edge| edge.is_accepted())
        .filter_map(|edge| edge.other_party(user))
        .collect();
    friends.sort();
    friends.dedup();
    friends
}

#[derive(Clone, Default)]
pub struct MemoryFriendGraph {
    edges: Arc<RwLock<Vec<FriendEdge>>>,
}

impl MemoryFriendGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_edge(&self, edge: FriendEdge) {
        self.edges.write().await.push(edge);
    }
}

#[async_trait]
impl FriendGraph for MemoryFriendGraph {
    async fn accepted_friends(&self, user: Uuid) -> BackendResult<Vec<Uuid>> {
        let edges = self.edges.read().await;
        Ok(accepted_counterparts(edges.iter(), user))
    }
}

/// Friend graph backed by the `friendships` table
#[derive(Clone)]
pub struct PgFriendGraph {
    pool: PgPool,
}

impl PgFriendGraph {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendGraph for PgFriendGraph {
    async fn accepted_friends(&self, user: Uuid) -> BackendResult<Vec<Uuid>> {
        let rows: Vec<(Uuid, Uuid, String)> = sqlx::query_as(
            r#"
            SELECT requester, recipient, status
            FROM friendships
            WHERE (requester = $1 OR recipient = $1) AND status = $2
            "#,
        )
        .bind(user)
        .bind(FriendStatus::Accepted.as_str())
        .fetch_all(&self.pool)
        .await?;

        let edges: Vec<FriendEdge> = rows
            .into_iter()
            .filter_map(|(requester, recipient, status)| {
                FriendStatus::parse(&status).map(|status| FriendEdge {
                    requester,
                    recipient,
                    status,
                })
            })
            .collect();

        Ok(accepted_counterparts(edges.iter(), user))
    }
}
