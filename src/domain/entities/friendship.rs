//! Friendship entity and repository trait.
//!
//! Maps to the `friendships` table. An edge is stored directed (requester
//! as `user_id`, recipient as `friend_id`) for audit, but is logically
//! undirected: at most one edge exists per unordered pair of users, in
//! either orientation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::user::User;

/// Friendship lifecycle status.
///
/// Rejection deletes the edge rather than storing a rejected state, so only
/// two states exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    #[default]
    Pending,
    Accepted,
}

impl FriendshipStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            _ => Self::Pending,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a friendship edge between two accounts.
///
/// Maps to the `friendships` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - user_id: BIGINT NOT NULL REFERENCES users(id) -- requester
/// - friend_id: BIGINT NOT NULL REFERENCES users(id) -- recipient
/// - status: VARCHAR(16) NOT NULL DEFAULT 'pending'
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// A unique index over (LEAST(user_id, friend_id), GREATEST(user_id,
/// friend_id)) enforces the one-edge-per-pair invariant; a CHECK constraint
/// forbids self-links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub id: i64,

    /// The account that sent the request
    pub user_id: i64,

    /// The account that received the request
    pub friend_id: i64,

    pub status: FriendshipStatus,

    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// Whether the edge touches the given user, in either role.
    pub fn involves(&self, user_id: i64) -> bool {
        self.user_id == user_id || self.friend_id == user_id
    }

    /// The other end of the edge, from `user_id`'s point of view.
    ///
    /// Returns `None` if the user is not part of this edge.
    pub fn counterpart_of(&self, user_id: i64) -> Option<i64> {
        if self.user_id == user_id {
            Some(self.friend_id)
        } else if self.friend_id == user_id {
            Some(self.user_id)
        } else {
            None
        }
    }

    /// Whether the stored recipient may still accept this edge.
    pub fn awaiting_acceptance_by(&self, user_id: i64) -> bool {
        self.status == FriendshipStatus::Pending && self.friend_id == user_id
    }
}

/// A friendship edge resolved to the counterpart's profile, as returned by
/// friend listings.
#[derive(Debug, Clone)]
pub struct FriendLink {
    /// The counterpart account's profile
    pub user: User,

    /// Status of the edge itself
    pub status: FriendshipStatus,
}

/// Repository trait for Friendship data access operations.
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Find the edge between two users, regardless of orientation.
    async fn find_between(&self, a: i64, b: i64) -> Result<Option<Friendship>, AppError>;

    /// Insert a pending edge with `requester_id` as the stored `user_id`.
    ///
    /// Fails with `AppError::Conflict` when an edge between the pair
    /// already exists (storage-level unique index on the unordered pair).
    async fn create_pending(
        &self,
        requester_id: i64,
        recipient_id: i64,
    ) -> Result<Friendship, AppError>;

    /// Flip the matching pending edge to accepted. The edge must have been
    /// requested by `requester_id` towards `recipient_id`. Returns the
    /// number of rows updated; zero is not an error.
    async fn accept(&self, recipient_id: i64, requester_id: i64) -> Result<u64, AppError>;

    /// Delete the edge between two users in either orientation. Returns the
    /// number of rows deleted; zero is not an error.
    async fn delete_between(&self, a: i64, b: i64) -> Result<u64, AppError>;

    /// All edges touching the user, resolved to the counterpart profile,
    /// newest edge first.
    async fn list_for(&self, user_id: i64) -> Result<Vec<FriendLink>, AppError>;
}
