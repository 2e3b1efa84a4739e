//! Server Member entity and repository trait.
//!
//! Maps to the `server_members` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Role of a member within a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    #[default]
    Member,
}

impl MemberRole {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "owner" => Self::Owner,
            _ => Self::Member,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user's membership in a server.
///
/// Maps to the `server_members` table:
/// - server_id: BIGINT NOT NULL REFERENCES servers(id) (composite PK)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) (composite PK)
/// - role: VARCHAR(16) NOT NULL DEFAULT 'member'
/// - joined_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Server ID (part of composite primary key)
    pub server_id: i64,

    /// User ID (part of composite primary key)
    pub user_id: i64,

    /// Membership role
    pub role: MemberRole,

    /// When the user joined the server
    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn is_owner(&self) -> bool {
        self.role == MemberRole::Owner
    }
}

/// Repository trait for Member data access operations.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member by server and user id.
    async fn find(&self, server_id: i64, user_id: i64) -> Result<Option<Member>, AppError>;

    /// Check if a user is a member of a server.
    async fn is_member(&self, server_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// All members of a server, oldest-joined-first.
    async fn find_by_server(&self, server_id: i64) -> Result<Vec<Member>, AppError>;

    /// Add a member to a server.
    ///
    /// Fails with `AppError::Conflict` on a duplicate (server, user) pair.
    async fn create(&self, member: &Member) -> Result<Member, AppError>;
}
