//! Channel entity and repository trait.
//!
//! Maps to the `channels` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Channel types matching the database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// A text channel within a server
    #[default]
    Text,
    /// A voice channel within a server
    Voice,
}

impl ChannelType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "voice" => Self::Voice,
            _ => Self::Text,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a channel within a server.
///
/// Maps to the `channels` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - server_id: BIGINT NOT NULL REFERENCES servers(id)
/// - name: VARCHAR(100) NOT NULL
/// - type: VARCHAR(16) NOT NULL DEFAULT 'text'
/// - position: INTEGER NOT NULL DEFAULT 0
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// `position` is assigned as the channel count of the server at creation
/// time and is never reindexed on deletion; gaps and the rare duplicate
/// from a concurrent create are permitted, with creation time as the
/// tie-breaker for ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,

    pub server_id: i64,

    /// Channel name (1-100 characters)
    pub name: String,

    /// Channel type
    #[serde(rename = "type")]
    pub channel_type: ChannelType,

    /// Sorting position within the server, zero-based
    pub position: i32,

    pub created_at: DateTime<Utc>,
}

impl Channel {
    /// Check if this is a text channel (can hold messages).
    pub fn is_text(&self) -> bool {
        matches!(self.channel_type, ChannelType::Text)
    }
}

/// Fields required to insert a channel.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub server_id: i64,
    pub name: String,
    pub channel_type: ChannelType,
    pub position: i32,
}

/// Repository trait for Channel data access operations.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find a channel by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Channel>, AppError>;

    /// All channels in a server, ordered by position then creation time.
    async fn find_by_server(&self, server_id: i64) -> Result<Vec<Channel>, AppError>;

    /// Number of channels currently in a server.
    async fn count_by_server(&self, server_id: i64) -> Result<i64, AppError>;

    /// Create a new channel.
    async fn create(&self, channel: &NewChannel) -> Result<Channel, AppError>;
}
