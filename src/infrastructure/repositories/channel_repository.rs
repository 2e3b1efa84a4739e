//! Channel Repository Implementation
//!
//! PostgreSQL implementation of the ChannelRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Channel, ChannelRepository, ChannelType, NewChannel};
use crate::shared::error::AppError;

/// Database row representation matching the channels table schema.
#[derive(Debug, sqlx::FromRow)]
struct ChannelRow {
    id: i64,
    server_id: i64,
    name: String,
    channel_type: String,
    position: i32,
    created_at: DateTime<Utc>,
}

impl ChannelRow {
    fn into_channel(self) -> Channel {
        Channel {
            id: self.id,
            server_id: self.server_id,
            name: self.name,
            channel_type: ChannelType::from_str(&self.channel_type),
            position: self.position,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL channel repository implementation.
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    /// Find a channel by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Channel>, AppError> {
        let row = sqlx::query_as::<_, ChannelRow>(
            r#"
            SELECT id, server_id, name, type AS channel_type, position, created_at
            FROM channels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_channel()))
    }

    /// All channels in a server. Position is the primary order; creation
    /// time breaks ties left by the benign concurrent-create race.
    async fn find_by_server(&self, server_id: i64) -> Result<Vec<Channel>, AppError> {
        let rows = sqlx::query_as::<_, ChannelRow>(
            r#"
            SELECT id, server_id, name, type AS channel_type, position, created_at
            FROM channels
            WHERE server_id = $1
            ORDER BY position, created_at
            "#,
        )
        .bind(server_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_channel()).collect())
    }

    /// Number of channels currently in a server.
    async fn count_by_server(&self, server_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM channels WHERE server_id = $1",
        )
        .bind(server_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Create a new channel.
    async fn create(&self, channel: &NewChannel) -> Result<Channel, AppError> {
        let row = sqlx::query_as::<_, ChannelRow>(
            r#"
            INSERT INTO channels (server_id, name, type, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, server_id, name, type AS channel_type, position, created_at
            "#,
        )
        .bind(channel.server_id)
        .bind(&channel.name)
        .bind(channel.channel_type.as_str())
        .bind(channel.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests would go here, requiring a test database
}
