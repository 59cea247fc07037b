//! Port for the append-only `user_actions` audit log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ERROR_ACTION_TYPE, UserAction, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user action adapters.
    pub enum UserActionRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "user action connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user action query failed: {message}",
    }
}

/// Records and counts user actions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserActionRepository: Send + Sync {
    /// Append an action; the database assigns `created_at`.
    async fn log_action(
        &self,
        user_id: UserId,
        action_type: String,
        details: Option<String>,
    ) -> Result<(), UserActionRepositoryError>;

    /// Number of actions the user logged strictly after `since`.
    async fn count_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, UserActionRepositoryError>;

    /// Actions of a user, newest first.
    async fn recent_actions(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<UserAction>, UserActionRepositoryError>;

    /// Record an error as an action of type `error`.
    async fn log_error(
        &self,
        user_id: UserId,
        message: String,
    ) -> Result<(), UserActionRepositoryError> {
        self.log_action(user_id, ERROR_ACTION_TYPE.to_owned(), Some(message))
            .await
    }
}

/// Fixture implementation that discards actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserActionRepository;

#[async_trait]
impl UserActionRepository for FixtureUserActionRepository {
    async fn log_action(
        &self,
        _user_id: UserId,
        _action_type: String,
        _details: Option<String>,
    ) -> Result<(), UserActionRepositoryError> {
        Ok(())
    }

    async fn count_since(
        &self,
        _user_id: UserId,
        _since: DateTime<Utc>,
    ) -> Result<u64, UserActionRepositoryError> {
        Ok(0)
    }

    async fn recent_actions(
        &self,
        _user_id: UserId,
        _limit: u32,
    ) -> Result<Vec<UserAction>, UserActionRepositoryError> {
        Ok(Vec::new())
    }
}
