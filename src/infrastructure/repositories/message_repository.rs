//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait. Listing
//! queries anchor on the newest rows (`ORDER BY ... DESC LIMIT n`); the
//! service reverses the page for delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    Message, MessageRepository, MessageSender, MessageWithSender, NewMessage,
};
use crate::shared::error::AppError;

/// Database row representation matching the messages table schema.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    sender_id: i64,
    channel_id: Option<i64>,
    recipient_id: Option<i64>,
    content: String,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            sender_id: self.sender_id,
            channel_id: self.channel_id,
            recipient_id: self.recipient_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

/// Joined row for message listings: the message plus the sender's partial
/// profile.
#[derive(Debug, sqlx::FromRow)]
struct MessageWithSenderRow {
    id: i64,
    sender_id: i64,
    channel_id: Option<i64>,
    recipient_id: Option<i64>,
    content: String,
    created_at: DateTime<Utc>,
    sender_username: String,
    sender_discriminator: String,
    sender_avatar_url: Option<String>,
}

impl MessageWithSenderRow {
    fn into_message_with_sender(self) -> MessageWithSender {
        MessageWithSender {
            sender: MessageSender {
                id: self.sender_id,
                username: self.sender_username,
                discriminator: self.sender_discriminator,
                avatar_url: self.sender_avatar_url,
            },
            message: Message {
                id: self.id,
                sender_id: self.sender_id,
                channel_id: self.channel_id,
                recipient_id: self.recipient_id,
                content: self.content,
                created_at: self.created_at,
            },
        }
    }
}

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Insert a new message; id and created_at are store-assigned.
    async fn create(&self, message: &NewMessage) -> Result<Message, AppError> {
        let (channel_id, recipient_id) = message.destination.as_columns();

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (sender_id, channel_id, recipient_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, channel_id, recipient_id, content, created_at
            "#,
        )
        .bind(message.sender_id)
        .bind(channel_id)
        .bind(recipient_id)
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    /// The most recent `limit` messages in a channel, newest first.
    async fn list_channel(
        &self,
        channel_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError> {
        let rows = sqlx::query_as::<_, MessageWithSenderRow>(
            r#"
            SELECT m.id, m.sender_id, m.channel_id, m.recipient_id, m.content, m.created_at,
                   u.username AS sender_username,
                   u.discriminator AS sender_discriminator,
                   u.avatar_url AS sender_avatar_url
            FROM messages m
            JOIN users u ON m.sender_id = u.id
            WHERE m.channel_id = $1
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $2
            "#,
        )
        .bind(channel_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message_with_sender()).collect())
    }

    /// The most recent `limit` direct messages between two users, in
    /// either direction, newest first.
    async fn list_direct(
        &self,
        user_id: i64,
        other_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError> {
        let rows = sqlx::query_as::<_, MessageWithSenderRow>(
            r#"
            SELECT m.id, m.sender_id, m.channel_id, m.recipient_id, m.content, m.created_at,
                   u.username AS sender_username,
                   u.discriminator AS sender_discriminator,
                   u.avatar_url AS sender_avatar_url
            FROM messages m
            JOIN users u ON m.sender_id = u.id
            WHERE (m.sender_id = $1 AND m.recipient_id = $2)
               OR (m.sender_id = $2 AND m.recipient_id = $1)
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message_with_sender()).collect())
    }

    /// Delete a message only if `sender_id` authored it; zero rows is not
    /// an error.
    async fn delete_by_sender(&self, message_id: i64, sender_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND sender_id = $2")
            .bind(message_id)
            .bind(sender_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
