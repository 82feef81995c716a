/**
 * PostgreSQL Conversation Store
 *
 * One row per participant pair. Messages live in a JSONB column so a
 * conversation is read and written as a single document; the per-user
 * markers are `UUID[]` columns so list queries can filter on them.
 *
 * The pair is stored as `(user_low, user_high)` with a unique constraint,
 * which makes `find_or_create` safe under concurrent first sends.
 *
 * Appends are a single `UPDATE`. Every other write locks the row with
 * `SELECT ... FOR UPDATE` for the length of its transaction, so an append
 * racing a delete or an archive toggle waits instead of being overwritten.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{ConversationChange, ConversationStore, ReadScope, WriteBack};
use crate::backend::error::{BackendError, BackendResult};
use crate::shared::messaging::{ChatMessage, Conversation, PageRequest, Participants};

const SELECT_COLUMNS: &str =
    "id, user_low, user_high, messages, deleted_for, archived_by, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    user_low: Uuid,
    user_high: Uuid,
    messages: Json<Vec<ChatMessage>>,
    deleted_for: Vec<Uuid>,
    archived_by: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = BackendError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        Ok(Conversation {
            id: row.id,
            participants: Participants::new(row.user_low, row.user_high)?,
            messages: row.messages.0,
            deleted_for: row.deleted_for,
            archived_by: row.archived_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_conversations(rows: Vec<ConversationRow>) -> BackendResult<Vec<Conversation>> {
    rows.into_iter().map(Conversation::try_from).collect()
}

/// Conversation store backed by PostgreSQL
#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn find(&self, id: Uuid) -> BackendResult<Option<Conversation>> {
        let row: Option<ConversationRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM conversations WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Conversation::try_from).transpose()
    }

    async fn find_between(&self, participants: Participants) -> BackendResult<Option<Conversation>> {
        let row: Option<ConversationRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM conversations WHERE user_low = $1 AND user_high = $2"
        ))
        .bind(participants.low())
        .bind(participants.high())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Conversation::try_from).transpose()
    }

    async fn find_or_create(&self, participants: Participants) -> BackendResult<Conversation> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO conversations (id, user_low, user_high)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_low, user_high) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(participants.low())
        .bind(participants.high())
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            tracing::debug!(
                "[Chat] Created conversation for {} and {}",
                participants.low(),
                participants.high()
            );
        }

        self.find_between(participants)
            .await?
            .ok_or_else(|| BackendError::store("conversation vanished after upsert"))
    }

    async fn append_message(
        &self,
        id: Uuid,
        message: &ChatMessage,
        restore_for: Uuid,
    ) -> BackendResult<Conversation> {
        let row: Option<ConversationRow> = sqlx::query_as(&format!(
            r#"
            UPDATE conversations
            SET messages = messages || jsonb_build_array($2::jsonb),
                deleted_for = array_remove(deleted_for, $3),
                updated_at = $4
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(message))
        .bind(restore_for)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Conversation::try_from)
            .transpose()?
            .ok_or_else(|| BackendError::not_found("Chat"))
    }

    async fn update(&self, id: Uuid, change: &mut ConversationChange<'_>) -> BackendResult<Option<Conversation>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ConversationRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM conversations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut conversation = Conversation::try_from(row)?;

        // An error here drops the transaction, which rolls it back
        match change(&mut conversation)? {
            WriteBack::Keep => {}
            WriteBack::Save => {
                conversation.touch();
                sqlx::query(
                    r#"
                    UPDATE conversations
                    SET messages = $2, deleted_for = $3, archived_by = $4, updated_at = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(Json(&conversation.messages))
                .bind(conversation.deleted_for.as_slice())
                .bind(conversation.archived_by.as_slice())
                .bind(conversation.updated_at)
                .execute(&mut *tx)
                .await?;
            }
            WriteBack::Remove => {
                sqlx::query("DELETE FROM conversations WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                tracing::debug!("[Chat] Removed conversation {}", id);
            }
        }
        tx.commit().await?;

        Ok(Some(conversation))
    }

    async fn list_for_user(
        &self,
        user: Uuid,
        archived: bool,
        page: PageRequest,
    ) -> BackendResult<(Vec<Conversation>, u64)> {
        const FILTER: &str = r#"
            (user_low = $1 OR user_high = $1)
            AND NOT ($1 = ANY(deleted_for))
            AND ($1 = ANY(archived_by)) = $2
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM conversations WHERE {FILTER}"))
            .bind(user)
            .bind(archived)
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<ConversationRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM conversations WHERE {FILTER} \
             ORDER BY updated_at DESC, id LIMIT $3 OFFSET $4"
        ))
        .bind(user)
        .bind(archived)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok((into_conversations(rows)?, total.max(0) as u64))
    }

    async fn list_all_for_user(&self, user: Uuid) -> BackendResult<Vec<Conversation>> {
        let rows: Vec<ConversationRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM conversations WHERE user_low = $1 OR user_high = $1"
        ))
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        into_conversations(rows)
    }

    async fn mark_read(&self, id: Uuid, reader: Uuid, scope: ReadScope<'_>) -> BackendResult<Option<usize>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ConversationRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM conversations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut conversation = Conversation::try_from(row)?;

        let flipped = match scope {
            ReadScope::All => conversation.mark_all_read(reader),
            ReadScope::Ids(ids) => conversation.mark_read_by_ids(reader, ids),
        };

        if flipped > 0 {
            sqlx::query("UPDATE conversations SET messages = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(Json(&conversation.messages))
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(Some(flipped))
    }
}
