//! Chat transcripts and threaded messages.
//!
//! Two storage shapes coexist: `chat_history` keeps one JSON array per user
//! for fast prompt assembly, while `messages` stores one row per message with
//! an optional parent so replies form threads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::MessageRole;

/// Chat platform user identifier (`BIGINT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a row in `messages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i32);

impl MessageId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a user's JSON chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<MessageId>,
}

impl ChatMessage {
    /// Build a history entry without a database id or parent.
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            timestamp,
            parent_message_id: None,
        }
    }
}

/// Input for inserting a row into `messages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub user_id: UserId,
    pub role: MessageRole,
    pub content: String,
    pub parent_message_id: Option<MessageId>,
}

impl MessageDraft {
    /// Start a new conversation thread.
    pub fn root(user_id: UserId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            content: content.into(),
            parent_message_id: None,
        }
    }

    /// Reply to an existing message.
    pub fn reply(
        parent: MessageId,
        user_id: UserId,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            parent_message_id: Some(parent),
            ..Self::root(user_id, role, content)
        }
    }
}

/// A persisted row from `messages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub parent_message_id: Option<MessageId>,
}

impl StoredMessage {
    /// Convert into the JSON history representation.
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            id: Some(self.id),
            role: self.role,
            content: self.content.clone(),
            timestamp: self.created_at,
            parent_message_id: self.parent_message_id,
        }
    }
}

/// A message within a thread with its distance from the thread root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadedMessage {
    pub message: StoredMessage,
    /// Zero for the root, one for direct replies, and so on.
    pub depth: u32,
}
