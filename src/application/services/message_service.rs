//! Message Service
//!
//! Sending, listing, and deleting channel and direct messages.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Message, MessageDestination, MessageRepository, MessageWithSender, NewMessage,
};

/// Page size used when the caller does not specify one.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Hard cap on a single page.
const MAX_PAGE_SIZE: i64 = 100;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Append a message to a channel or a direct-message stream.
    async fn send(&self, request: SendMessageDto) -> Result<Message, MessageError>;

    /// The newest `limit` messages for the destination, delivered in
    /// ascending chronological order. Pagination anchors on the newest
    /// `limit` rows; the page itself reads oldest-first.
    async fn list(
        &self,
        viewer_id: i64,
        destination: MessageDestination,
        limit: Option<i64>,
    ) -> Result<Vec<MessageWithSender>, MessageError>;

    /// Delete a message if `requester_id` is its sender; a silent no-op
    /// otherwise.
    async fn delete(&self, message_id: i64, requester_id: i64) -> Result<(), MessageError>;
}

/// Send message request
#[derive(Debug, Clone)]
pub struct SendMessageDto {
    pub sender_id: i64,
    pub destination: MessageDestination,
    pub content: String,
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message content required")]
    ContentRequired,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// MessageService implementation
pub struct MessageServiceImpl<R>
where
    R: MessageRepository,
{
    message_repo: Arc<R>,
}

impl<R> MessageServiceImpl<R>
where
    R: MessageRepository,
{
    pub fn new(message_repo: Arc<R>) -> Self {
        Self { message_repo }
    }
}

#[async_trait]
impl<R> MessageService for MessageServiceImpl<R>
where
    R: MessageRepository + 'static,
{
    async fn send(&self, request: SendMessageDto) -> Result<Message, MessageError> {
        if request.content.trim().is_empty() {
            return Err(MessageError::ContentRequired);
        }

        let new_message = NewMessage {
            sender_id: request.sender_id,
            destination: request.destination,
            content: request.content,
        };

        self.message_repo
            .create(&new_message)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))
    }

    async fn list(
        &self,
        viewer_id: i64,
        destination: MessageDestination,
        limit: Option<i64>,
    ) -> Result<Vec<MessageWithSender>, MessageError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let mut rows = match destination {
            MessageDestination::Channel(channel_id) => self
                .message_repo
                .list_channel(channel_id, limit)
                .await
                .map_err(|e| MessageError::Internal(e.to_string()))?,
            MessageDestination::Direct(other_id) => self
                .message_repo
                .list_direct(viewer_id, other_id, limit)
                .await
                .map_err(|e| MessageError::Internal(e.to_string()))?,
        };

        // The query anchors on the newest rows (DESC + LIMIT); reversing
        // afterwards delivers the page oldest-first.
        rows.reverse();
        Ok(rows)
    }

    async fn delete(&self, message_id: i64, requester_id: i64) -> Result<(), MessageError> {
        let deleted = self
            .message_repo
            .delete_by_sender(message_id, requester_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        // Deleting someone else's message (or a missing one) is a silent
        // success, matching the source behavior.
        if deleted == 0 {
            tracing::debug!(message_id, requester_id, "delete matched no owned message");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mockall::mock;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    use crate::domain::MessageSender;
    use crate::shared::error::AppError;

    mock! {
        MessageRepo {}

        #[async_trait]
        impl MessageRepository for MessageRepo {
            async fn create(&self, message: &NewMessage) -> Result<Message, AppError>;
            async fn list_channel(
                &self,
                channel_id: i64,
                limit: i64,
            ) -> Result<Vec<MessageWithSender>, AppError>;
            async fn list_direct(
                &self,
                user_id: i64,
                other_id: i64,
                limit: i64,
            ) -> Result<Vec<MessageWithSender>, AppError>;
            async fn delete_by_sender(&self, message_id: i64, sender_id: i64) -> Result<u64, AppError>;
        }
    }

    fn channel_row(id: i64) -> MessageWithSender {
        MessageWithSender {
            message: Message {
                id,
                sender_id: 1,
                channel_id: Some(10),
                recipient_id: None,
                content: format!("message {}", id),
                created_at: Utc::now() + Duration::seconds(id),
            },
            sender: MessageSender {
                id: 1,
                username: "ava".to_string(),
                discriminator: "0001".to_string(),
                avatar_url: None,
            },
        }
    }

    fn service(repo: MockMessageRepo) -> MessageServiceImpl<MockMessageRepo> {
        MessageServiceImpl::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_send_rejects_empty_content() {
        let result = service(MockMessageRepo::new())
            .send(SendMessageDto {
                sender_id: 1,
                destination: MessageDestination::Channel(10),
                content: "  ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(MessageError::ContentRequired)));
    }

    #[tokio::test]
    async fn test_list_reverses_page_to_ascending_order() {
        let mut repo = MockMessageRepo::new();
        repo.expect_list_channel()
            .with(eq(10), eq(50))
            .returning(|_, limit| {
                // Newest first, ids 60 down to 11.
                Ok((0..limit).map(|i| channel_row(60 - i)).collect())
            });

        let page = service(repo)
            .list(1, MessageDestination::Channel(10), None)
            .await
            .expect("list failed");

        assert_eq!(page.len(), 50);
        let ids: Vec<i64> = page.iter().map(|m| m.message.id).collect();
        assert_eq!(ids.first(), Some(&11));
        assert_eq!(ids.last(), Some(&60));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(page
            .windows(2)
            .all(|w| w[0].message.created_at <= w[1].message.created_at));
    }

    #[tokio::test]
    async fn test_list_caps_oversized_limits() {
        let mut repo = MockMessageRepo::new();
        repo.expect_list_channel()
            .with(eq(10), eq(MAX_PAGE_SIZE))
            .returning(|_, _| Ok(vec![]));

        let page = service(repo)
            .list(1, MessageDestination::Channel(10), Some(5000))
            .await
            .expect("list failed");

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_list_direct_uses_viewer_and_counterpart() {
        let mut repo = MockMessageRepo::new();
        repo.expect_list_direct()
            .with(eq(1), eq(2), eq(25))
            .returning(|_, _, _| Ok(vec![]));

        let result = service(repo)
            .list(1, MessageDestination::Direct(2), Some(25))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_non_sender_is_silent() {
        let mut repo = MockMessageRepo::new();
        repo.expect_delete_by_sender()
            .with(eq(5), eq(99))
            .returning(|_, _| Ok(0));

        let result = service(repo).delete(5, 99).await;

        assert!(result.is_ok());
    }
}
