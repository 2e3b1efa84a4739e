//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! Each repository handles data access for a specific entity type, mapping
//! database rows into domain entities and unique-constraint violations into
//! typed errors.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - Accounts, identity lookups, credential checks
//! - **PgFriendshipRepository** - Friendship edges and listings
//! - **PgServerRepository** - Servers, including the transactional create
//! - **PgMemberRepository** - Server memberships
//! - **PgChannelRepository** - Channels and position counting
//! - **PgMessageRepository** - Channel and direct messages

pub mod channel_repository;
pub mod friendship_repository;
pub mod member_repository;
pub mod message_repository;
pub mod server_repository;
pub mod user_repository;

pub use channel_repository::PgChannelRepository;
pub use friendship_repository::PgFriendshipRepository;
pub use member_repository::PgMemberRepository;
pub use message_repository::PgMessageRepository;
pub use server_repository::PgServerRepository;
pub use user_repository::PgUserRepository;
