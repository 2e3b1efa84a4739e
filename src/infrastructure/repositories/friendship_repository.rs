//! Friendship Repository Implementation
//!
//! PostgreSQL implementation of the FriendshipRepository trait. Edges are
//! stored directed (requester, recipient) but every query treats the pair
//! as unordered.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{FriendLink, Friendship, FriendshipRepository, FriendshipStatus, User, UserStatus};
use crate::shared::error::AppError;

/// Database row representation matching the friendships table schema.
#[derive(Debug, sqlx::FromRow)]
struct FriendshipRow {
    id: i64,
    user_id: i64,
    friend_id: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl FriendshipRow {
    fn into_friendship(self) -> Friendship {
        Friendship {
            id: self.id,
            user_id: self.user_id,
            friend_id: self.friend_id,
            status: FriendshipStatus::from_str(&self.status),
            created_at: self.created_at,
        }
    }
}

/// Joined row for friend listings: the counterpart's profile plus the
/// edge's own status.
#[derive(Debug, sqlx::FromRow)]
struct FriendLinkRow {
    id: i64,
    public_id: String,
    email: String,
    username: String,
    discriminator: String,
    password_hash: String,
    status: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    custom_status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    friend_status: String,
}

impl FriendLinkRow {
    fn into_link(self) -> FriendLink {
        FriendLink {
            user: User {
                id: self.id,
                public_id: self.public_id,
                email: self.email,
                username: self.username,
                discriminator: self.discriminator,
                password_hash: self.password_hash,
                status: self.status.map(|s| UserStatus::from_str(&s)).unwrap_or_default(),
                avatar_url: self.avatar_url,
                bio: self.bio,
                custom_status: self.custom_status,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            status: FriendshipStatus::from_str(&self.friend_status),
        }
    }
}

/// PostgreSQL friendship repository implementation.
///
/// The one-edge-per-unordered-pair invariant lives in the
/// `friendships_pair_key` unique index; inserts that lose the race come
/// back as `Conflict`.
#[derive(Clone)]
pub struct PgFriendshipRepository {
    pool: PgPool,
}

impl PgFriendshipRepository {
    /// Create a new PgFriendshipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipRepository for PgFriendshipRepository {
    /// Find the edge between two users, regardless of orientation.
    async fn find_between(&self, a: i64, b: i64) -> Result<Option<Friendship>, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(
            r#"
            SELECT id, user_id, friend_id, status, created_at
            FROM friendships
            WHERE (user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_friendship()))
    }

    /// Insert a pending edge with the requester as the stored `user_id`.
    async fn create_pending(
        &self,
        requester_id: i64,
        recipient_id: i64,
    ) -> Result<Friendship, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(
            r#"
            INSERT INTO friendships (user_id, friend_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, user_id, friend_id, status, created_at
            "#,
        )
        .bind(requester_id)
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Friend request already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_friendship())
    }

    /// Unconditional UPDATE of the matching pending edge; zero rows is not
    /// an error.
    async fn accept(&self, recipient_id: i64, requester_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE friendships
            SET status = 'accepted'
            WHERE friend_id = $1 AND user_id = $2 AND status = 'pending'
            "#,
        )
        .bind(recipient_id)
        .bind(requester_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete the edge in either orientation; zero rows is not an error.
    async fn delete_between(&self, a: i64, b: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE (user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// All edges touching the user, joined to the counterpart's profile,
    /// newest edge first.
    async fn list_for(&self, user_id: i64) -> Result<Vec<FriendLink>, AppError> {
        let rows = sqlx::query_as::<_, FriendLinkRow>(
            r#"
            SELECT u.id, u.public_id, u.email, u.username, u.discriminator,
                   u.password_hash, u.status, u.avatar_url, u.bio, u.custom_status,
                   u.created_at, u.updated_at,
                   f.status AS friend_status
            FROM friendships f
            JOIN users u
              ON u.id = CASE WHEN f.user_id = $1 THEN f.friend_id ELSE f.user_id END
            WHERE f.user_id = $1 OR f.friend_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_link()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests would go here, requiring a test database
}
