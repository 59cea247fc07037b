//! PostgreSQL-backed chat transcript adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Jsonb};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ChatHistoryRepository, ChatHistoryRepositoryError};
use crate::domain::{ChatMessage, UserId};

use super::diesel_error_mapping::{Failure, FailureKind};
use super::pool::DbPool;
use super::schema::chat_history;

/// Appends to the existing array in place so concurrent writers never race
/// on a read-modify-write of the whole transcript.
const APPEND_SQL: &str = concat!(
    "INSERT INTO chat_history (user_id, history) ",
    "VALUES ($1, $2) ",
    "ON CONFLICT (user_id) DO UPDATE ",
    "SET history = chat_history.history || EXCLUDED.history"
);

/// Diesel-backed implementation of [`ChatHistoryRepository`].
#[derive(Clone)]
pub struct DieselChatHistoryRepository {
    pool: DbPool,
}

impl DieselChatHistoryRepository {
    /// Create a repository over `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use salesdesk::outbound::persistence::{DbPool, DieselChatHistoryRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/salesdesk")).await?;
    /// let repository = DieselChatHistoryRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<Failure>) -> ChatHistoryRepositoryError {
    let Failure { kind, message } = failure.into();
    match kind {
        FailureKind::Connection => ChatHistoryRepositoryError::connection(message),
        FailureKind::Conflict | FailureKind::Constraint | FailureKind::Query => {
            ChatHistoryRepositoryError::query(message)
        }
    }
}

fn decode_history(value: serde_json::Value) -> Result<Vec<ChatMessage>, ChatHistoryRepositoryError> {
    serde_json::from_value(value)
        .map_err(|err| ChatHistoryRepositoryError::serialization(err.to_string()))
}

#[async_trait]
impl ChatHistoryRepository for DieselChatHistoryRepository {
    async fn load_history(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChatMessage>, ChatHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let history = chat_history::table
            .find(user_id.as_i64())
            .select(chat_history::history)
            .first::<serde_json::Value>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        history.map_or_else(|| Ok(Vec::new()), decode_history)
    }

    async fn append_message(
        &self,
        user_id: UserId,
        message: ChatMessage,
    ) -> Result<(), ChatHistoryRepositoryError> {
        let entry = serde_json::to_value([message])
            .map_err(|err| ChatHistoryRepositoryError::serialization(err.to_string()))?;
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::sql_query(APPEND_SQL)
            .bind::<BigInt, _>(user_id.as_i64())
            .bind::<Jsonb, _>(entry)
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageRole;
    use crate::outbound::persistence::pool::PoolError;
    use rstest::rstest;

    #[rstest]
    fn stored_history_decodes_in_order() {
        let value = serde_json::json!([
            {"role": "user", "content": "Привет", "timestamp": "2025-01-20T10:00:00Z"},
            {"role": "assistant", "content": "Здравствуйте", "timestamp": "2025-01-20T10:00:01Z"}
        ]);
        let history = decode_history(value).expect("valid history");

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, MessageRole::Assistant);
    }

    #[rstest]
    fn malformed_history_is_a_serialization_error() {
        let err = decode_history(serde_json::json!({"role": "user"}))
            .expect_err("objects are not transcripts");
        assert!(matches!(err, ChatHistoryRepositoryError::Serialization { .. }));
    }

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let err = map_failure(PoolError::checkout("timeout"));
        assert_eq!(err, ChatHistoryRepositoryError::connection("timeout"));
    }
}
