//! # Domain Entities
//!
//! Core domain entities representing the main business objects in the
//! messaging platform. All entities map directly to their corresponding
//! database tables.
//!
//! ## Core Entities
//!
//! - **User**: Account with public identity (public id + discriminator) and profile
//! - **Friendship**: Directed-stored, logically undirected edge between two accounts
//! - **Server**: A community owned by a user, containing channels and members
//! - **Member**: A user's membership in a specific server, with a role
//! - **Channel**: A communication space within a server
//! - **Message**: A text message sent to a channel or directly to another user
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod channel;
mod friendship;
mod member;
mod message;
mod server;
mod user;

// Re-export User entity and related types
pub use user::{NewUser, User, UserRepository, UserStatus};

// Re-export Friendship entity and related types
pub use friendship::{FriendLink, Friendship, FriendshipRepository, FriendshipStatus};

// Re-export Server entity and related types
pub use server::{NewServer, Server, ServerRepository};

// Re-export Member entity and related types
pub use member::{Member, MemberRepository, MemberRole};

// Re-export Channel entity and related types
pub use channel::{Channel, ChannelRepository, ChannelType, NewChannel};

// Re-export Message entity and related types
pub use message::{
    Message, MessageDestination, MessageRepository, MessageSender, MessageWithSender, NewMessage,
};
