//! Account Service
//!
//! Registration, login, identity allocation, and profile management.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::{NewUser, User, UserRepository, UserStatus};
use crate::shared::error::AppError;
use crate::shared::identity;

/// How many times a register call re-allocates identity after losing a
/// uniqueness race before giving up.
const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// One-way credential digest, pluggable for tests and future hardening.
pub trait CredentialHasher: Send + Sync {
    /// Digest a plaintext secret into its stored form.
    fn digest(&self, secret: &str) -> String;
}

/// SHA-256 hex digest. Deterministic, so login stays a single
/// `(email, digest)` lookup.
#[derive(Debug, Clone, Default)]
pub struct Sha256CredentialHasher;

impl CredentialHasher for Sha256CredentialHasher {
    fn digest(&self, secret: &str) -> String {
        format!("{:x}", Sha256::digest(secret.as_bytes()))
    }
}

/// Account service trait for dependency injection
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account, allocating its public identity.
    async fn register(&self, request: RegisterAccountDto) -> Result<User, AccountError>;

    /// Authenticate with credentials; flips the account online.
    async fn login(&self, email: &str, password: &str) -> Result<User, AccountError>;

    /// Fetch a user's full profile.
    async fn get_profile(&self, user_id: i64) -> Result<User, AccountError>;

    /// Apply profile updates (avatar, bio, custom status, presence).
    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileDto,
    ) -> Result<User, AccountError>;
}

/// Registration request
#[derive(Debug, Clone)]
pub struct RegisterAccountDto {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Profile update request
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub custom_status: Option<String>,
    pub status: Option<UserStatus>,
}

/// Account service errors
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AccountService implementation
pub struct AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    user_repo: Arc<U>,
    hasher: H,
}

impl<U, H> AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    /// Create a new AccountServiceImpl
    pub fn new(user_repo: Arc<U>, hasher: H) -> Self {
        Self { user_repo, hasher }
    }

    /// Pick a public id and a discriminator for `username`.
    ///
    /// The taken-discriminator set is fetched once and probed in memory;
    /// the storage constraints remain the true uniqueness enforcers and a
    /// lost race comes back as `AppError::DuplicateIdentity`.
    async fn allocate_identity(&self, username: &str) -> Result<(String, String), AccountError> {
        let taken: HashSet<String> = self
            .user_repo
            .taken_discriminators(username)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?
            .into_iter()
            .collect();

        let public_id = identity::allocate_public_id();
        let discriminator = identity::allocate_discriminator(username, |_, d| taken.contains(d));

        Ok((public_id, discriminator))
    }
}

#[async_trait]
impl<U, H> AccountService for AccountServiceImpl<U, H>
where
    U: UserRepository + 'static,
    H: CredentialHasher + 'static,
{
    async fn register(&self, request: RegisterAccountDto) -> Result<User, AccountError> {
        if request.email.trim().is_empty()
            || request.username.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AccountError::MissingFields);
        }

        // Advisory probe; the users.email unique constraint backs it up.
        if self
            .user_repo
            .email_exists(&request.email)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?
        {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = self.hasher.digest(&request.password);

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let (public_id, discriminator) = self.allocate_identity(&request.username).await?;

            let new_user = NewUser {
                public_id,
                email: request.email.clone(),
                username: request.username.clone(),
                discriminator,
                password_hash: password_hash.clone(),
                status: UserStatus::Online,
            };

            match self.user_repo.create(&new_user).await {
                Ok(user) => return Ok(user),
                Err(AppError::DuplicateIdentity) => {
                    tracing::warn!(attempt, username = %request.username, "identity allocation collided, retrying");
                }
                Err(AppError::Conflict(_)) => return Err(AccountError::EmailTaken),
                Err(e) => return Err(AccountError::Internal(e.to_string())),
            }
        }

        Err(AccountError::Internal(
            "identity allocation kept colliding".into(),
        ))
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::MissingFields);
        }

        let digest = self.hasher.digest(password);

        // Single lookup by (email, digest); the error never reveals which
        // of the two was wrong.
        let mut user = self
            .user_repo
            .find_by_credentials(email, &digest)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?
            .ok_or(AccountError::InvalidCredentials)?;

        self.user_repo
            .update_status(user.id, UserStatus::Online)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?;
        user.status = UserStatus::Online;

        Ok(user)
    }

    async fn get_profile(&self, user_id: i64) -> Result<User, AccountError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?
            .ok_or(AccountError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileDto,
    ) -> Result<User, AccountError> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        if let Some(custom_status) = update.custom_status {
            user.custom_status = Some(custom_status);
        }
        if let Some(status) = update.status {
            user.status = status;
        }

        self.user_repo
            .update_profile(&user)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AccountError::NotFound,
                e => AccountError::Internal(e.to_string()),
            })
    }
}
