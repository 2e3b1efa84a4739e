//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Maps between the database schema and the domain User entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewUser, User, UserRepository, UserStatus};
use crate::shared::error::AppError;

/// Database row representation matching the users table schema.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    public_id: String,
    email: String,
    username: String,
    discriminator: String,
    password_hash: String,
    status: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    custom_status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert database row to domain User entity.
    fn into_user(self) -> User {
        User {
            id: self.id,
            public_id: self.public_id,
            email: self.email,
            username: self.username,
            discriminator: self.discriminator,
            password_hash: self.password_hash,
            status: self.status.map(|s| UserStatus::from_str(&s)).unwrap_or_default(),
            avatar_url: self.avatar_url,
            bio: self.bio,
            custom_status: self.custom_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, public_id, email, username, discriminator, password_hash, \
                            status, avatar_url, bio, custom_status, created_at, updated_at";

/// PostgreSQL user repository implementation.
///
/// Uses sqlx against the `users` table. Uniqueness of the email, the public
/// id, and the (username, discriminator) pair is enforced by schema
/// constraints; violations are mapped to `Conflict` or `DuplicateIdentity`
/// by constraint name.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation on the users table to the typed error the
/// services branch on. Identity-column collisions are retried by the
/// Account Directory; an email collision is a caller error.
fn map_user_insert_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            match db_err.constraint() {
                Some("users_public_id_key") | Some("users_username_discriminator_key") => {
                    AppError::DuplicateIdentity
                }
                _ => AppError::Conflict("Email already registered".to_string()),
            }
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    /// Find a user by their internal id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Find a user by their public id.
    async fn find_by_public_id(&self, public_id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id = $1"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Find a user matching both email and credential digest.
    async fn find_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND password_hash = $2"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Insert a new user; id and timestamps are store-assigned.
    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (public_id, email, username, discriminator, password_hash, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.public_id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.discriminator)
        .bind(&user.password_hash)
        .bind(user.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_insert_error)?;

        Ok(row.into_user())
    }

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// All discriminators taken for a username.
    async fn taken_discriminators(&self, username: &str) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT discriminator FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Update the user's presence status.
    async fn update_status(&self, id: i64, status: UserStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        Ok(())
    }

    /// Update the user's profile fields.
    async fn update_profile(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET avatar_url = $2,
                bio = $3,
                custom_status = $4,
                status = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.avatar_url)
        .bind(&user.bio)
        .bind(&user.custom_status)
        .bind(user.status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))?;

        Ok(row.into_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests would go here, requiring a test database
}
