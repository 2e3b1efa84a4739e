//! Common Test Utilities
//!
//! In-memory implementations of the repository traits, enforcing the same
//! uniqueness semantics as the PostgreSQL schema, plus a pre-wired service
//! stack for driving full flows without a database.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use relay_server::application::services::{
    AccountServiceImpl, FriendServiceImpl, MessageServiceImpl, ServerServiceImpl,
    Sha256CredentialHasher,
};
use relay_server::domain::{
    Channel, ChannelRepository, FriendLink, Friendship, FriendshipRepository, FriendshipStatus,
    Member, MemberRepository, MemberRole, Message, MessageRepository, MessageSender,
    MessageWithSender, NewChannel, NewMessage, NewServer, NewUser, Server, ServerRepository, User,
    UserRepository, UserStatus,
};
use relay_server::shared::error::AppError;

/// Shared user table.
#[derive(Default)]
pub struct UserStore {
    pub users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl UserStore {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn sender_profile(&self, user_id: i64) -> Option<MessageSender> {
        self.users.lock().unwrap().iter().find(|u| u.id == user_id).map(|u| MessageSender {
            id: u.id,
            username: u.username.clone(),
            discriminator: u.discriminator.clone(),
            avatar_url: u.avatar_url.clone(),
        })
    }
}

/// In-memory UserRepository with the schema's uniqueness semantics.
pub struct MemoryUserRepository {
    store: Arc<UserStore>,
}

impl MemoryUserRepository {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.store.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_public_id(&self, public_id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.public_id == public_id)
            .cloned())
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.password_hash == password_hash)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let mut users = self.store.users.lock().unwrap();

        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        if users.iter().any(|u| u.public_id == user.public_id) {
            return Err(AppError::DuplicateIdentity);
        }
        if users
            .iter()
            .any(|u| u.username == user.username && u.discriminator == user.discriminator)
        {
            return Err(AppError::DuplicateIdentity);
        }

        let now = Utc::now();
        let created = User {
            id: self.store.next_id(),
            public_id: user.public_id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            discriminator: user.discriminator.clone(),
            password_hash: user.password_hash.clone(),
            status: user.status,
            avatar_url: None,
            bio: None,
            custom_status: None,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.store.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn taken_discriminators(&self, username: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.username == username)
            .map(|u| u.discriminator.clone())
            .collect())
    }

    async fn update_status(&self, id: i64, status: UserStatus) -> Result<(), AppError> {
        let mut users = self.store.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;
        user.status = status;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_profile(&self, updated: &User) -> Result<User, AppError> {
        let mut users = self.store.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == updated.id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", updated.id)))?;
        user.avatar_url = updated.avatar_url.clone();
        user.bio = updated.bio.clone();
        user.custom_status = updated.custom_status.clone();
        user.status = updated.status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

/// In-memory FriendshipRepository with the unordered-pair unique index.
pub struct MemoryFriendshipRepository {
    users: Arc<UserStore>,
    edges: Mutex<Vec<Friendship>>,
    next_id: AtomicI64,
}

impl MemoryFriendshipRepository {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self {
            users,
            edges: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl FriendshipRepository for MemoryFriendshipRepository {
    async fn find_between(&self, a: i64, b: i64) -> Result<Option<Friendship>, AppError> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .find(|f| (f.user_id == a && f.friend_id == b) || (f.user_id == b && f.friend_id == a))
            .cloned())
    }

    async fn create_pending(
        &self,
        requester_id: i64,
        recipient_id: i64,
    ) -> Result<Friendship, AppError> {
        let mut edges = self.edges.lock().unwrap();

        let pair_taken = edges.iter().any(|f| {
            (f.user_id == requester_id && f.friend_id == recipient_id)
                || (f.user_id == recipient_id && f.friend_id == requester_id)
        });
        if pair_taken {
            return Err(AppError::Conflict("Friend request already exists".into()));
        }

        let edge = Friendship {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: requester_id,
            friend_id: recipient_id,
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
        };
        edges.push(edge.clone());

        Ok(edge)
    }

    async fn accept(&self, recipient_id: i64, requester_id: i64) -> Result<u64, AppError> {
        let mut edges = self.edges.lock().unwrap();
        let mut updated = 0;
        for edge in edges.iter_mut() {
            if edge.friend_id == recipient_id
                && edge.user_id == requester_id
                && edge.status == FriendshipStatus::Pending
            {
                edge.status = FriendshipStatus::Accepted;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_between(&self, a: i64, b: i64) -> Result<u64, AppError> {
        let mut edges = self.edges.lock().unwrap();
        let before = edges.len();
        edges.retain(|f| {
            !((f.user_id == a && f.friend_id == b) || (f.user_id == b && f.friend_id == a))
        });
        Ok((before - edges.len()) as u64)
    }

    async fn list_for(&self, user_id: i64) -> Result<Vec<FriendLink>, AppError> {
        let users = self.users.users.lock().unwrap();
        let mut edges: Vec<Friendship> = self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.involves(user_id))
            .cloned()
            .collect();
        // newest edge first
        edges.sort_by(|a, b| b.id.cmp(&a.id));

        let links = edges
            .into_iter()
            .filter_map(|edge| {
                let other_id = edge.counterpart_of(user_id)?;
                let user = users.iter().find(|u| u.id == other_id)?.clone();
                Some(FriendLink {
                    user,
                    status: edge.status,
                })
            })
            .collect();

        Ok(links)
    }
}

/// Shared server-side tables, so the transactional create can touch all
/// three the way the SQL transaction does.
#[derive(Default)]
pub struct ServerStore {
    pub servers: Mutex<Vec<Server>>,
    pub members: Mutex<Vec<Member>>,
    pub channels: Mutex<Vec<Channel>>,
    next_server_id: AtomicI64,
    next_channel_id: AtomicI64,
    /// When set, the next create_with_owner fails before writing anything,
    /// simulating a mid-transaction failure with rollback.
    pub fail_next_create: AtomicBool,
}

impl ServerStore {
    fn next_server_id(&self) -> i64 {
        self.next_server_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_channel_id(&self) -> i64 {
        self.next_channel_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub struct MemoryServerRepository {
    store: Arc<ServerStore>,
}

impl MemoryServerRepository {
    pub fn new(store: Arc<ServerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ServerRepository for MemoryServerRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError> {
        Ok(self.store.servers.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn create_with_owner(
        &self,
        server: &NewServer,
        default_channel_name: &str,
    ) -> Result<Server, AppError> {
        // All-or-nothing: fail before any write, as a rolled-back
        // transaction would leave no rows behind.
        if self.store.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal("simulated transaction failure".into()));
        }

        let created = Server {
            id: self.store.next_server_id(),
            name: server.name.clone(),
            icon_url: server.icon_url.clone(),
            owner_id: server.owner_id,
            created_at: Utc::now(),
        };

        self.store.servers.lock().unwrap().push(created.clone());
        self.store.members.lock().unwrap().push(Member {
            server_id: created.id,
            user_id: server.owner_id,
            role: MemberRole::Owner,
            joined_at: created.created_at,
        });
        self.store.channels.lock().unwrap().push(Channel {
            id: self.store.next_channel_id(),
            server_id: created.id,
            name: default_channel_name.to_string(),
            channel_type: Default::default(),
            position: 0,
            created_at: created.created_at,
        });

        Ok(created)
    }

    async fn find_by_member(&self, user_id: i64) -> Result<Vec<Server>, AppError> {
        let members = self.store.members.lock().unwrap();
        let servers = self.store.servers.lock().unwrap();
        let mut joined: Vec<Server> = servers
            .iter()
            .filter(|s| members.iter().any(|m| m.server_id == s.id && m.user_id == user_id))
            .cloned()
            .collect();
        // newest-created-first; ids are assigned in creation order
        joined.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(joined)
    }
}

pub struct MemoryMemberRepository {
    store: Arc<ServerStore>,
}

impl MemoryMemberRepository {
    pub fn new(store: Arc<ServerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MemberRepository for MemoryMemberRepository {
    async fn find(&self, server_id: i64, user_id: i64) -> Result<Option<Member>, AppError> {
        Ok(self
            .store
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.server_id == server_id && m.user_id == user_id)
            .cloned())
    }

    async fn is_member(&self, server_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.find(server_id, user_id).await?.is_some())
    }

    async fn find_by_server(&self, server_id: i64) -> Result<Vec<Member>, AppError> {
        let mut members: Vec<Member> = self
            .store
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.server_id == server_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn create(&self, member: &Member) -> Result<Member, AppError> {
        let mut members = self.store.members.lock().unwrap();
        if members
            .iter()
            .any(|m| m.server_id == member.server_id && m.user_id == member.user_id)
        {
            return Err(AppError::Conflict("Already a member of this server".into()));
        }
        members.push(member.clone());
        Ok(member.clone())
    }
}

pub struct MemoryChannelRepository {
    store: Arc<ServerStore>,
}

impl MemoryChannelRepository {
    pub fn new(store: Arc<ServerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChannelRepository for MemoryChannelRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Channel>, AppError> {
        Ok(self.store.channels.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_server(&self, server_id: i64) -> Result<Vec<Channel>, AppError> {
        let mut channels: Vec<Channel> = self
            .store
            .channels
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.server_id == server_id)
            .cloned()
            .collect();
        channels.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(channels)
    }

    async fn count_by_server(&self, server_id: i64) -> Result<i64, AppError> {
        Ok(self
            .store
            .channels
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.server_id == server_id)
            .count() as i64)
    }

    async fn create(&self, channel: &NewChannel) -> Result<Channel, AppError> {
        let created = Channel {
            id: self.store.next_channel_id(),
            server_id: channel.server_id,
            name: channel.name.clone(),
            channel_type: channel.channel_type,
            position: channel.position,
            created_at: Utc::now(),
        };
        self.store.channels.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

/// In-memory MessageRepository with strictly monotonic timestamps.
pub struct MemoryMessageRepository {
    users: Arc<UserStore>,
    messages: Mutex<Vec<Message>>,
    next_id: AtomicI64,
    base: DateTime<Utc>,
}

impl MemoryMessageRepository {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self {
            users,
            messages: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
            base: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    fn with_sender(&self, message: Message) -> Result<MessageWithSender, AppError> {
        let sender = self
            .users
            .sender_profile(message.sender_id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", message.sender_id)))?;
        Ok(MessageWithSender { message, sender })
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<Message, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let (channel_id, recipient_id) = message.destination.as_columns();
        let created = Message {
            id,
            sender_id: message.sender_id,
            channel_id,
            recipient_id,
            content: message.content.clone(),
            // one microsecond apart per row keeps created_at monotonic
            created_at: self.base + Duration::microseconds(id),
        };
        self.messages.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_channel(
        &self,
        channel_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError> {
        let mut rows: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.channel_id == Some(channel_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        rows.into_iter().map(|m| self.with_sender(m)).collect()
    }

    async fn list_direct(
        &self,
        user_id: i64,
        other_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, AppError> {
        let mut rows: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                (m.sender_id == user_id && m.recipient_id == Some(other_id))
                    || (m.sender_id == other_id && m.recipient_id == Some(user_id))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        rows.into_iter().map(|m| self.with_sender(m)).collect()
    }

    async fn delete_by_sender(&self, message_id: i64, sender_id: i64) -> Result<u64, AppError> {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| !(m.id == message_id && m.sender_id == sender_id));
        Ok((before - messages.len()) as u64)
    }
}

/// The full service stack wired over the in-memory stores.
pub struct TestBackend {
    pub user_store: Arc<UserStore>,
    pub server_store: Arc<ServerStore>,
    pub message_repo: Arc<MemoryMessageRepository>,
    pub accounts: AccountServiceImpl<MemoryUserRepository, Sha256CredentialHasher>,
    pub friends: FriendServiceImpl<MemoryUserRepository, MemoryFriendshipRepository>,
    pub servers:
        ServerServiceImpl<MemoryServerRepository, MemoryChannelRepository, MemoryMemberRepository>,
    pub messages: MessageServiceImpl<MemoryMessageRepository>,
}

impl TestBackend {
    pub fn new() -> Self {
        let user_store = Arc::new(UserStore::default());
        let server_store = Arc::new(ServerStore::default());

        let user_repo = Arc::new(MemoryUserRepository::new(user_store.clone()));
        let friendship_repo = Arc::new(MemoryFriendshipRepository::new(user_store.clone()));
        let message_repo = Arc::new(MemoryMessageRepository::new(user_store.clone()));

        Self {
            user_store: user_store.clone(),
            server_store: server_store.clone(),
            message_repo: message_repo.clone(),
            accounts: AccountServiceImpl::new(user_repo.clone(), Sha256CredentialHasher),
            friends: FriendServiceImpl::new(user_repo, friendship_repo),
            servers: ServerServiceImpl::new(
                Arc::new(MemoryServerRepository::new(server_store.clone())),
                Arc::new(MemoryChannelRepository::new(server_store.clone())),
                Arc::new(MemoryMemberRepository::new(server_store)),
            ),
            messages: MessageServiceImpl::new(message_repo),
        }
    }
}

/// Generate a unique test email
pub fn unique_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

/// Generate a unique test username
pub fn unique_username() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().to_string()[..8])
}
