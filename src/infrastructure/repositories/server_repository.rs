//! Server Repository Implementation
//!
//! PostgreSQL implementation of the ServerRepository trait, including the
//! transactional server-creation sequence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewServer, Server, ServerRepository};
use crate::shared::error::AppError;

/// Database row representation matching the servers table schema.
#[derive(Debug, sqlx::FromRow)]
struct ServerRow {
    id: i64,
    name: String,
    icon_url: Option<String>,
    owner_id: i64,
    created_at: DateTime<Utc>,
}

impl ServerRow {
    fn into_server(self) -> Server {
        Server {
            id: self.id,
            name: self.name,
            icon_url: self.icon_url,
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL server repository implementation.
#[derive(Clone)]
pub struct PgServerRepository {
    pool: PgPool,
}

impl PgServerRepository {
    /// Create a new PgServerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServerRepository for PgServerRepository {
    /// Find a server by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError> {
        let row = sqlx::query_as::<_, ServerRow>(
            "SELECT id, name, icon_url, owner_id, created_at FROM servers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_server()))
    }

    /// Create the server, the owner's membership, and the default text
    /// channel in a single transaction. A failure in any insert rolls back
    /// all three.
    async fn create_with_owner(
        &self,
        server: &NewServer,
        default_channel_name: &str,
    ) -> Result<Server, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ServerRow>(
            r#"
            INSERT INTO servers (name, icon_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, icon_url, owner_id, created_at
            "#,
        )
        .bind(&server.name)
        .bind(&server.icon_url)
        .bind(server.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO server_members (server_id, user_id, role)
            VALUES ($1, $2, 'owner')
            "#,
        )
        .bind(row.id)
        .bind(server.owner_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO channels (server_id, name, type, position)
            VALUES ($1, $2, 'text', 0)
            "#,
        )
        .bind(row.id)
        .bind(default_channel_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_server())
    }

    /// Servers where the user holds any membership, newest-created-first.
    async fn find_by_member(&self, user_id: i64) -> Result<Vec<Server>, AppError> {
        let rows = sqlx::query_as::<_, ServerRow>(
            r#"
            SELECT s.id, s.name, s.icon_url, s.owner_id, s.created_at
            FROM servers s
            JOIN server_members sm ON s.id = sm.server_id
            WHERE sm.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_server()).collect())
    }
}
