//! Port for the per-user JSON chat transcript in `chat_history`.

use async_trait::async_trait;

use crate::domain::{ChatMessage, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by chat history adapters.
    pub enum ChatHistoryRepositoryError {
        /// Connection to the database failed.
        Connection { message: String } => "chat history connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "chat history query failed: {message}",
        /// A history entry could not be encoded or decoded.
        Serialization { message: String } => "chat history entry is malformed: {message}",
    }
}

/// Reads and extends a user's chat transcript.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Return the transcript in append order; empty for unknown users.
    async fn load_history(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChatMessage>, ChatHistoryRepositoryError>;

    /// Append one entry, creating the row on first use.
    ///
    /// Implementations must append atomically so concurrent writers never
    /// lose entries.
    async fn append_message(
        &self,
        user_id: UserId,
        message: ChatMessage,
    ) -> Result<(), ChatHistoryRepositoryError>;
}
