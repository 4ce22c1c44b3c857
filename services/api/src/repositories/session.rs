//! Session repository for bearer token persistence

use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewSession, Session};

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new session for an issued token
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        info!("Creating session for user: {}", new_session.user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(new_session.user_id)
        .bind(&new_session.token_hash)
        .bind(new_session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_session(&row))
    }

    /// Find an unexpired session by token hash
    pub async fn find_valid_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row_to_session(&row)))
    }

    /// Delete a single session by ID. Other sessions for the same user
    /// are left untouched.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting session: {}", id);

        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_session(row: &sqlx::postgres::PgRow) -> Session {
    Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        token_hash: row.get("token_hash"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }
}
