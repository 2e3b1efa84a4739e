//! Message entity and repository trait.
//!
//! Maps to the `messages` table. A message targets exactly one of a
//! channel or a direct-message recipient; a CHECK constraint makes the
//! XOR a storage invariant. Messages are immutable except for deletion by
//! their original sender.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Where a message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDestination {
    /// A server channel
    Channel(i64),
    /// Another user's direct-message stream
    Direct(i64),
}

impl MessageDestination {
    /// Split into the nullable column pair stored in the database.
    pub fn as_columns(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            Self::Channel(id) => (Some(id), None),
            Self::Direct(user_id) => (None, Some(user_id)),
        }
    }

    /// Rebuild from the nullable column pair. Returns `None` when the row
    /// violates the XOR invariant (never expected past the CHECK constraint).
    pub fn from_columns(channel_id: Option<i64>, recipient_id: Option<i64>) -> Option<Self> {
        match (channel_id, recipient_id) {
            (Some(id), None) => Some(Self::Channel(id)),
            (None, Some(id)) => Some(Self::Direct(id)),
            _ => None,
        }
    }
}

/// Represents a message sent to a channel or directly to another user.
///
/// Maps to the `messages` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - sender_id: BIGINT NOT NULL REFERENCES users(id)
/// - channel_id: BIGINT NULL REFERENCES channels(id)
/// - recipient_id: BIGINT NULL REFERENCES users(id)
/// - content: TEXT NOT NULL, non-empty
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,

    pub sender_id: i64,

    /// Set for channel messages
    pub channel_id: Option<i64>,

    /// Set for direct messages
    pub recipient_id: Option<i64>,

    pub content: String,

    pub created_at: DateTime<Utc>,
}

impl Message {
    /// The message's destination, if the row is well-formed.
    pub fn destination(&self) -> Option<MessageDestination> {
        MessageDestination::from_columns(self.channel_id, self.recipient_id)
    }

    /// Whether the given user authored this message.
    pub fn is_sent_by(&self, user_id: i64) -> bool {
        self.sender_id == user_id
    }
}

/// Fields required to insert a message; id and created_at are
/// store-assigned.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: i64,
    pub destination: MessageDestination,
    pub content: String,
}

/// Partial sender profile attached to listed messages.
#[derive(Debug, Clone, Serialize)]
pub struct MessageSender {
    pub id: i64,
    pub username: String,
    pub discriminator: String,
    pub avatar_url: Option<String>,
}

/// A message joined with its sender's partial profile.
#[derive(Debug, Clone)]
pub struct MessageWithSender {
    pub message: Message,
    pub sender: MessageSender,
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a new message and return it with the store-assigned id and
    /// timestamp.
    async fn create(&self, message: &NewMessage) -> Result<Message, AppError>;

    /// The most recent `limit` messages in a channel, newest first, each
    /// joined with the sender's partial profile.
    async fn list_channel(
        &self,
        channel_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError>;

    /// The most recent `limit` direct messages between two users (either
    /// direction), newest first.
    async fn list_direct(
        &self,
        user_id: i64,
        other_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError>;

    /// Delete a message only if `sender_id` authored it. Returns the number
    /// of rows deleted; zero is not an error.
    async fn delete_by_sender(&self, message_id: i64, sender_id: i64) -> Result<u64, AppError>;
}
