//! Server Service
//!
//! Server creation, membership listings, and channel management.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Channel, ChannelRepository, ChannelType, Member, MemberRepository, NewChannel, NewServer,
    Server, ServerRepository,
};

/// Name of the text channel every new server starts with.
pub const DEFAULT_CHANNEL_NAME: &str = "general";

/// Server service trait
#[async_trait]
pub trait ServerService: Send + Sync {
    /// Create a server together with its owner membership and default
    /// channel, atomically.
    async fn create_server(
        &self,
        owner_id: i64,
        request: CreateServerDto,
    ) -> Result<Server, ServerError>;

    /// Create a channel at the end of the server's channel list.
    async fn create_channel(
        &self,
        server_id: i64,
        request: CreateChannelDto,
    ) -> Result<Channel, ServerError>;

    /// Servers the user belongs to, newest-created-first.
    async fn list_servers(&self, user_id: i64) -> Result<Vec<Server>, ServerError>;

    /// Channels of a server, ordered by position then creation time.
    async fn list_channels(&self, server_id: i64) -> Result<Vec<Channel>, ServerError>;

    /// Members of a server, oldest-joined-first.
    async fn list_members(&self, server_id: i64) -> Result<Vec<Member>, ServerError>;
}

/// Create server request
#[derive(Debug, Clone)]
pub struct CreateServerDto {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Create channel request
#[derive(Debug, Clone)]
pub struct CreateChannelDto {
    pub name: String,
    pub channel_type: ChannelType,
}

/// Server service errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Name is required")]
    NameRequired,

    #[error("Server not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ServerService implementation
pub struct ServerServiceImpl<S, C, M>
where
    S: ServerRepository,
    C: ChannelRepository,
    M: MemberRepository,
{
    server_repo: Arc<S>,
    channel_repo: Arc<C>,
    member_repo: Arc<M>,
}

impl<S, C, M> ServerServiceImpl<S, C, M>
where
    S: ServerRepository,
    C: ChannelRepository,
    M: MemberRepository,
{
    pub fn new(server_repo: Arc<S>, channel_repo: Arc<C>, member_repo: Arc<M>) -> Self {
        Self {
            server_repo,
            channel_repo,
            member_repo,
        }
    }
}

#[async_trait]
impl<S, C, M> ServerService for ServerServiceImpl<S, C, M>
where
    S: ServerRepository + 'static,
    C: ChannelRepository + 'static,
    M: MemberRepository + 'static,
{
    async fn create_server(
        &self,
        owner_id: i64,
        request: CreateServerDto,
    ) -> Result<Server, ServerError> {
        if request.name.trim().is_empty() {
            return Err(ServerError::NameRequired);
        }

        let new_server = NewServer {
            name: request.name,
            icon_url: request.icon_url,
            owner_id,
        };

        // Server row, owner membership, and the default channel commit in
        // one transaction inside the repository.
        self.server_repo
            .create_with_owner(&new_server, DEFAULT_CHANNEL_NAME)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn create_channel(
        &self,
        server_id: i64,
        request: CreateChannelDto,
    ) -> Result<Channel, ServerError> {
        if request.name.trim().is_empty() {
            return Err(ServerError::NameRequired);
        }

        self.server_repo
            .find_by_id(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .ok_or(ServerError::NotFound)?;

        // Check-then-act position assignment. Two concurrent creates can
        // land on the same position; listings fall back to creation time,
        // and positions are never reindexed on deletion.
        let position = self
            .channel_repo
            .count_by_server(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let new_channel = NewChannel {
            server_id,
            name: request.name,
            channel_type: request.channel_type,
            position: position as i32,
        };

        self.channel_repo
            .create(&new_channel)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn list_servers(&self, user_id: i64) -> Result<Vec<Server>, ServerError> {
        self.server_repo
            .find_by_member(user_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn list_channels(&self, server_id: i64) -> Result<Vec<Channel>, ServerError> {
        self.channel_repo
            .find_by_server(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn list_members(&self, server_id: i64) -> Result<Vec<Member>, ServerError> {
        self.member_repo
            .find_by_server(server_id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
