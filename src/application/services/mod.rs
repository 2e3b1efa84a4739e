//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AccountService**: Registration, login, identity allocation, profile management
//! - **FriendService**: Friendship request lifecycle and listings
//! - **ServerService**: Server creation, membership, and channel management
//! - **MessageService**: Channel and direct message operations

pub mod account_service;
pub mod friend_service;
pub mod message_service;
pub mod server_service;

// Re-export account service types
pub use account_service::{
    AccountError, AccountService, AccountServiceImpl, CredentialHasher, RegisterAccountDto,
    Sha256CredentialHasher, UpdateProfileDto,
};

// Re-export friend service types
pub use friend_service::{FriendError, FriendService, FriendServiceImpl};

// Re-export server service types
pub use server_service::{
    CreateChannelDto, CreateServerDto, ServerError, ServerService, ServerServiceImpl,
    DEFAULT_CHANNEL_NAME,
};

// Re-export message service types
pub use message_service::{MessageError, MessageService, MessageServiceImpl, SendMessageDto};
