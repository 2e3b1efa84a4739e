//! Member Repository Implementation
//!
//! PostgreSQL implementation of the MemberRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Member, MemberRepository, MemberRole};
use crate::shared::error::AppError;

/// Database row representation matching the server_members table schema.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    server_id: i64,
    user_id: i64,
    role: String,
    joined_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self) -> Member {
        Member {
            server_id: self.server_id,
            user_id: self.user_id,
            role: MemberRole::from_str(&self.role),
            joined_at: self.joined_at,
        }
    }
}

/// PostgreSQL member repository implementation.
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    /// Find a member by server and user id.
    async fn find(&self, server_id: i64, user_id: i64) -> Result<Option<Member>, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT server_id, user_id, role, joined_at
            FROM server_members
            WHERE server_id = $1 AND user_id = $2
            "#,
        )
        .bind(server_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_member()))
    }

    /// Check if a user is a member of a server.
    async fn is_member(&self, server_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM server_members WHERE server_id = $1 AND user_id = $2)",
        )
        .bind(server_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// All members of a server, oldest-joined-first.
    async fn find_by_server(&self, server_id: i64) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT server_id, user_id, role, joined_at
            FROM server_members
            WHERE server_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(server_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_member()).collect())
    }

    /// Add a member to a server.
    async fn create(&self, member: &Member) -> Result<Member, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            INSERT INTO server_members (server_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING server_id, user_id, role, joined_at
            "#,
        )
        .bind(member.server_id)
        .bind(member.user_id)
        .bind(member.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Already a member of this server".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_member())
    }
}
