//! Response DTOs
//!
//! Data structures for API response bodies. Numeric ids are serialized as
//! strings for JavaScript number-safety.

use serde::Serialize;

use crate::domain::{
    Channel, FriendLink, Member, Message, MessageWithSender, Server, User,
};

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub public_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub username: String,
    pub discriminator: String,
    pub status: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub custom_status: Option<String>,
    pub created_at: String,
}

impl UserResponse {
    /// Build from a user, including the email only for the account's own
    /// views.
    pub fn from_user(user: User, include_email: bool) -> Self {
        Self {
            id: user.id.to_string(),
            public_id: user.public_id,
            email: if include_email { Some(user.email) } else { None },
            username: user.username,
            discriminator: user.discriminator,
            status: user.status.as_str().to_string(),
            avatar_url: user.avatar_url,
            bio: user.bio,
            custom_status: user.custom_status,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Registration response: the created identity tuple
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub public_id: String,
    pub email: String,
    pub username: String,
    pub discriminator: String,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            public_id: user.public_id,
            email: user.email,
            username: user.username,
            discriminator: user.discriminator,
        }
    }
}

/// A friend listing entry: counterpart profile plus the edge's own status
#[derive(Debug, Serialize)]
pub struct FriendResponse {
    pub id: String,
    pub public_id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar_url: Option<String>,
    pub status: String,
    pub friend_status: String,
}

impl From<FriendLink> for FriendResponse {
    fn from(link: FriendLink) -> Self {
        Self {
            id: link.user.id.to_string(),
            public_id: link.user.public_id,
            username: link.user.username,
            discriminator: link.user.discriminator,
            avatar_url: link.user.avatar_url,
            status: link.user.status.as_str().to_string(),
            friend_status: link.status.as_str().to_string(),
        }
    }
}

/// Server response
#[derive(Debug, Serialize)]
pub struct ServerResponse {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub owner_id: String,
    pub created_at: String,
}

impl From<Server> for ServerResponse {
    fn from(server: Server) -> Self {
        Self {
            id: server.id.to_string(),
            name: server.name,
            icon_url: server.icon_url,
            owner_id: server.owner_id.to_string(),
            created_at: server.created_at.to_rfc3339(),
        }
    }
}

/// Member response
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub server_id: String,
    pub user_id: String,
    pub role: String,
    pub joined_at: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            server_id: member.server_id.to_string(),
            user_id: member.user_id.to_string(),
            role: member.role.as_str().to_string(),
            joined_at: member.joined_at.to_rfc3339(),
        }
    }
}

/// Channel response
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub id: String,
    pub server_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub position: i32,
    pub created_at: String,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self {
            id: channel.id.to_string(),
            server_id: channel.server_id.to_string(),
            name: channel.name,
            channel_type: channel.channel_type.as_str().to_string(),
            position: channel.position,
            created_at: channel.created_at.to_rfc3339(),
        }
    }
}

/// Message author (partial user)
#[derive(Debug, Serialize)]
pub struct MessageAuthor {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar_url: Option<String>,
}

/// Message response (as listed)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub sender: MessageAuthor,
}

impl From<MessageWithSender> for MessageResponse {
    fn from(row: MessageWithSender) -> Self {
        Self {
            id: row.message.id.to_string(),
            content: row.message.content,
            created_at: row.message.created_at.to_rfc3339(),
            sender: MessageAuthor {
                id: row.sender.id.to_string(),
                username: row.sender.username,
                discriminator: row.sender.discriminator,
                avatar_url: row.sender.avatar_url,
            },
        }
    }
}

/// Simple acknowledgement body
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: &'static str,
}

impl AckResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Acknowledgement returned when a message is sent
#[derive(Debug, Serialize)]
pub struct MessageAckResponse {
    pub id: String,
    pub created_at: String,
}

impl From<Message> for MessageAckResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}
