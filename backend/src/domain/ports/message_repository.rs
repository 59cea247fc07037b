//! Port for threaded messages stored one row per message.

use async_trait::async_trait;

use crate::domain::{MessageDraft, MessageId, StoredMessage, ThreadedMessage, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by message repository adapters.
    pub enum MessageRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "message repository query failed: {message}",
        /// A row violated a schema constraint, such as a missing parent.
        ConstraintViolation { message: String } =>
            "message violates a schema constraint: {message}",
        /// The requested message does not exist.
        NotFound { id: i32 } => "message {id} not found",
    }
}

/// Inserts messages and walks reply threads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message and return its id.
    async fn insert(&self, draft: MessageDraft) -> Result<MessageId, MessageRepositoryError>;

    /// Return `root` and every transitive reply, ordered by creation time.
    ///
    /// Fails with `NotFound` when `root` does not exist.
    async fn thread(&self, root: MessageId)
    -> Result<Vec<ThreadedMessage>, MessageRepositoryError>;

    /// Most recent messages of a user, newest first.
    async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, MessageRepositoryError>;
}
