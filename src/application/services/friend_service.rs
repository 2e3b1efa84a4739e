//! Friend Service
//!
//! Friendship request lifecycle: send, accept, remove, list.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{FriendLink, Friendship, FriendshipRepository, UserRepository};
use crate::shared::error::AppError;

/// Friend service trait
#[async_trait]
pub trait FriendService: Send + Sync {
    /// Send a friend request to the account holding `target_public_id`.
    async fn send_request(
        &self,
        requester_id: i64,
        target_public_id: &str,
    ) -> Result<Friendship, FriendError>;

    /// Accept a pending request previously sent by `requester_id` to
    /// `recipient_id`. Silently succeeds when no matching pending edge
    /// exists.
    async fn accept_request(&self, recipient_id: i64, requester_id: i64)
        -> Result<(), FriendError>;

    /// Remove the edge between two users, whichever direction it was
    /// stored in. Idempotent.
    async fn remove(&self, user_id: i64, other_id: i64) -> Result<(), FriendError>;

    /// All edges touching the user, resolved to counterpart profiles,
    /// newest edge first.
    async fn list_for(&self, user_id: i64) -> Result<Vec<FriendLink>, FriendError>;
}

/// Friend service errors
#[derive(Debug, thiserror::Error)]
pub enum FriendError {
    #[error("User not found")]
    TargetNotFound,

    #[error("Cannot add yourself")]
    SelfRequest,

    #[error("Friend request already exists")]
    AlreadyLinked,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// FriendService implementation
pub struct FriendServiceImpl<U, F>
where
    U: UserRepository,
    F: FriendshipRepository,
{
    user_repo: Arc<U>,
    friendship_repo: Arc<F>,
}

impl<U, F> FriendServiceImpl<U, F>
where
    U: UserRepository,
    F: FriendshipRepository,
{
    pub fn new(user_repo: Arc<U>, friendship_repo: Arc<F>) -> Self {
        Self {
            user_repo,
            friendship_repo,
        }
    }
}

#[async_trait]
impl<U, F> FriendService for FriendServiceImpl<U, F>
where
    U: UserRepository + 'static,
    F: FriendshipRepository + 'static,
{
    async fn send_request(
        &self,
        requester_id: i64,
        target_public_id: &str,
    ) -> Result<Friendship, FriendError> {
        let target = self
            .user_repo
            .find_by_public_id(target_public_id)
            .await
            .map_err(|e| FriendError::Internal(e.to_string()))?
            .ok_or(FriendError::TargetNotFound)?;

        if target.id == requester_id {
            return Err(FriendError::SelfRequest);
        }

        // Advisory duplicate check; the unordered-pair unique index is the
        // true enforcer under concurrency.
        if self
            .friendship_repo
            .find_between(requester_id, target.id)
            .await
            .map_err(|e| FriendError::Internal(e.to_string()))?
            .is_some()
        {
            return Err(FriendError::AlreadyLinked);
        }

        self.friendship_repo
            .create_pending(requester_id, target.id)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => FriendError::AlreadyLinked,
                e => FriendError::Internal(e.to_string()),
            })
    }

    async fn accept_request(
        &self,
        recipient_id: i64,
        requester_id: i64,
    ) -> Result<(), FriendError> {
        let updated = self
            .friendship_repo
            .accept(recipient_id, requester_id)
            .await
            .map_err(|e| FriendError::Internal(e.to_string()))?;

        // Unconditional update, matching the source: accepting an edge
        // that is not pending towards this recipient is a silent no-op.
        if updated == 0 {
            tracing::debug!(recipient_id, requester_id, "accept matched no pending edge");
        }

        Ok(())
    }

    async fn remove(&self, user_id: i64, other_id: i64) -> Result<(), FriendError> {
        self.friendship_repo
            .delete_between(user_id, other_id)
            .await
            .map_err(|e| FriendError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn list_for(&self, user_id: i64) -> Result<Vec<FriendLink>, FriendError> {
        self.friendship_repo
            .list_for(user_id)
            .await
            .map_err(|e| FriendError::Internal(e.to_string()))
    }
}
