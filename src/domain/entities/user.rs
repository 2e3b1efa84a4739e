//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// User presence status matching the database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Offline,
    Online,
    Idle,
    Dnd,
}

impl UserStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "online" => Self::Online,
            "idle" => Self::Idle,
            "dnd" => Self::Dnd,
            _ => Self::Offline,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY (store-assigned)
/// - public_id: VARCHAR(16) NOT NULL UNIQUE -- shareable handle, RELAY-XXXX-XXXX
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - username: VARCHAR(32) NOT NULL
/// - discriminator: CHAR(4) NOT NULL -- UNIQUE together with username
/// - password_hash: VARCHAR(64) NOT NULL
/// - status: VARCHAR(20) NOT NULL DEFAULT 'offline'
/// - avatar_url: TEXT NULL
/// - bio: TEXT NULL
/// - custom_status: VARCHAR(128) NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned numeric primary key
    pub id: i64,

    /// Globally unique shareable handle (`RELAY-XXXX-XXXX`)
    pub public_id: String,

    /// Email address (unique)
    pub email: String,

    /// Username; unique only in combination with the discriminator
    pub username: String,

    /// 4-digit zero-padded discriminator
    pub discriminator: String,

    /// One-way credential digest
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Presence status
    #[serde(default)]
    pub status: UserStatus,

    /// URL to the user's avatar image
    pub avatar_url: Option<String>,

    /// Bio/about-me text
    pub bio: Option<String>,

    /// Free-form custom status line
    pub custom_status: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The `username#discriminator` form shown in clients.
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Check if the user is currently reachable (online, idle, or dnd).
    pub fn is_online(&self) -> bool {
        matches!(self.status, UserStatus::Online | UserStatus::Idle | UserStatus::Dnd)
    }
}

/// Fields required to insert a user; the id and timestamps are
/// store-assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub public_id: String,
    pub email: String,
    pub username: String,
    pub discriminator: String,
    pub password_hash: String,
    pub status: UserStatus,
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their numeric id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by their public id.
    async fn find_by_public_id(&self, public_id: &str) -> Result<Option<User>, AppError>;

    /// Find a user matching both email and credential digest.
    async fn find_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError>;

    /// Insert a new user.
    ///
    /// Fails with `AppError::Conflict` on a duplicate email and
    /// `AppError::DuplicateIdentity` when the public id or the
    /// (username, discriminator) pair loses a uniqueness race.
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// All discriminators already taken for a username.
    async fn taken_discriminators(&self, username: &str) -> Result<Vec<String>, AppError>;

    /// Update the user's presence status.
    async fn update_status(&self, id: i64, status: UserStatus) -> Result<(), AppError>;

    /// Update the user's profile fields.
    async fn update_profile(&self, user: &User) -> Result<User, AppError>;
}
