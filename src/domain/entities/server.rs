//! Server entity and repository trait.
//!
//! Maps to the `servers` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a server (community) owned by a user.
///
/// Maps to the `servers` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - icon_url: TEXT NULL
/// - owner_id: BIGINT NOT NULL REFERENCES users(id)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// The owner is implicitly a member with role `owner`; the membership row
/// and a default text channel are created in the same transaction as the
/// server itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,

    /// Server name (1-100 characters)
    pub name: String,

    /// URL to the server's icon image
    pub icon_url: Option<String>,

    /// Owning user's id
    pub owner_id: i64,

    pub created_at: DateTime<Utc>,
}

impl Server {
    /// Check if the given user owns this server.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// Fields required to insert a server.
#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
    pub icon_url: Option<String>,
    pub owner_id: i64,
}

/// Repository trait for Server data access operations.
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Find a server by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError>;

    /// Atomically create the server, the owner's membership row, and a
    /// default text channel at position 0. All three inserts commit
    /// together or not at all.
    async fn create_with_owner(
        &self,
        server: &NewServer,
        default_channel_name: &str,
    ) -> Result<Server, AppError>;

    /// Servers where the user holds any membership, newest-created-first.
    async fn find_by_member(&self, user_id: i64) -> Result<Vec<Server>, AppError>;
}
