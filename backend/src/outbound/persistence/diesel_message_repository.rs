//! PostgreSQL-backed threaded message adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Int4;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{
    MessageDraft, MessageId, MessageRole, StoredMessage, ThreadedMessage, UserId,
};

use super::diesel_error_mapping::{Failure, FailureKind};
use super::models::{MessageRow, NewMessageRow, ThreadRow};
use super::pool::DbPool;
use super::schema::messages;

/// Root plus all transitive replies, each with its depth below the root.
const THREAD_SQL: &str = "\
WITH RECURSIVE thread AS (
    SELECT id, user_id, role, content, created_at, parent_message_id, 0 AS depth
    FROM messages
    WHERE id = $1
    UNION ALL
    SELECT m.id, m.user_id, m.role, m.content, m.created_at, m.parent_message_id, t.depth + 1
    FROM messages m
    JOIN thread t ON m.parent_message_id = t.id
)
SELECT id, user_id, role, content, created_at, parent_message_id, depth
FROM thread
ORDER BY created_at, id";

/// Diesel-backed implementation of [`MessageRepository`].
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<Failure>) -> MessageRepositoryError {
    let Failure { kind, message } = failure.into();
    match kind {
        FailureKind::Connection => MessageRepositoryError::connection(message),
        FailureKind::Constraint => MessageRepositoryError::constraint_violation(message),
        FailureKind::Conflict | FailureKind::Query => MessageRepositoryError::query(message),
    }
}

fn parse_role(role: &str) -> Result<MessageRole, MessageRepositoryError> {
    role.parse()
        .map_err(|err: crate::domain::ParseMessageRoleError| {
            MessageRepositoryError::query(err.to_string())
        })
}

fn stored_message(row: MessageRow) -> Result<StoredMessage, MessageRepositoryError> {
    Ok(StoredMessage {
        id: MessageId::new(row.id),
        user_id: UserId::new(row.user_id),
        role: parse_role(&row.role)?,
        content: row.content,
        created_at: row.created_at,
        parent_message_id: row.parent_message_id.map(MessageId::new),
    })
}

fn threaded_message(row: ThreadRow) -> Result<ThreadedMessage, MessageRepositoryError> {
    let depth = u32::try_from(row.depth)
        .map_err(|_| MessageRepositoryError::query(format!("negative depth {}", row.depth)))?;
    let message = stored_message(MessageRow {
        id: row.id,
        user_id: row.user_id,
        role: row.role,
        content: row.content,
        created_at: row.created_at,
        parent_message_id: row.parent_message_id,
    })?;
    Ok(ThreadedMessage { message, depth })
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, draft: MessageDraft) -> Result<MessageId, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewMessageRow {
            user_id: draft.user_id.as_i64(),
            role: draft.role.as_str(),
            content: draft.content.as_str(),
            parent_message_id: draft.parent_message_id.map(|id| id.as_i32()),
        };
        let id = diesel::insert_into(messages::table)
            .values(&row)
            .returning(messages::id)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(MessageId::new(id))
    }

    async fn thread(
        &self,
        root: MessageId,
    ) -> Result<Vec<ThreadedMessage>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<ThreadRow> = diesel::sql_query(THREAD_SQL)
            .bind::<Int4, _>(root.as_i32())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        if rows.is_empty() {
            return Err(MessageRepositoryError::not_found(root.as_i32()));
        }
        rows.into_iter().map(threaded_message).collect()
    }

    async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = messages::table
            .filter(messages::user_id.eq(user_id.as_i64()))
            .order_by((messages::created_at.desc(), messages::id.desc()))
            .limit(i64::from(limit))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(stored_message).collect()
    }
}
