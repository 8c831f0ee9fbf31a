//! Recruit session repository.
//!
//! Expiry is not filtered in SQL on purpose: resolution must observe an
//! expired row so it can purge it, and must let legacy rows (NULL
//! `expires_at`) through.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

/// Repository for recruit session operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a freshly issued session.
    pub async fn create(
        &self,
        token: &str,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            INSERT INTO recruit_sessions (token, email, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, email, created_at, updated_at, expires_at
            "#,
        )
        .bind(token)
        .bind(email)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Look a session up by its token, expired or not.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_token");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT token, email, created_at, updated_at, expires_at
            FROM recruit_sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a session (logout, or purge on observed expiry).
    pub async fn delete(&self, token: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_session");
        let result = sqlx::query("DELETE FROM recruit_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Bump `updated_at` on authenticated use. Never touches `expires_at`;
    /// a session's absolute lifetime is fixed at issuance.
    pub async fn touch(&self, token: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("touch_session");
        sqlx::query("UPDATE recruit_sessions SET updated_at = NOW() WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}
