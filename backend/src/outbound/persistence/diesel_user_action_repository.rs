//! PostgreSQL-backed audit log adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserActionRepository, UserActionRepositoryError};
use crate::domain::{UserAction, UserId};

use super::diesel_error_mapping::{Failure, FailureKind};
use super::models::{NewUserActionRow, UserActionRow};
use super::pool::DbPool;
use super::schema::user_actions;

/// Diesel-backed implementation of [`UserActionRepository`].
#[derive(Clone)]
pub struct DieselUserActionRepository {
    pool: DbPool,
}

impl DieselUserActionRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<Failure>) -> UserActionRepositoryError {
    let Failure { kind, message } = failure.into();
    match kind {
        FailureKind::Connection => UserActionRepositoryError::connection(message),
        FailureKind::Conflict | FailureKind::Constraint | FailureKind::Query => {
            UserActionRepositoryError::query(message)
        }
    }
}

impl From<UserActionRow> for UserAction {
    fn from(row: UserActionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id.map(UserId::new),
            action_type: row.action_type,
            details: row.details,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserActionRepository for DieselUserActionRepository {
    async fn log_action(
        &self,
        user_id: UserId,
        action_type: String,
        details: Option<String>,
    ) -> Result<(), UserActionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewUserActionRow {
            user_id: user_id.as_i64(),
            action_type: action_type.as_str(),
            details: details.as_deref(),
        };
        diesel::insert_into(user_actions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(())
    }

    async fn count_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, UserActionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let count: i64 = user_actions::table
            .filter(user_actions::user_id.eq(user_id.as_i64()))
            .filter(user_actions::created_at.gt(since))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        u64::try_from(count).map_err(|_| UserActionRepositoryError::query("negative row count"))
    }

    async fn recent_actions(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<UserAction>, UserActionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = user_actions::table
            .filter(user_actions::user_id.eq(user_id.as_i64()))
            .order_by((user_actions::created_at.desc(), user_actions::id.desc()))
            .limit(i64::from(limit))
            .select(UserActionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(UserAction::from).collect())
    }
}
