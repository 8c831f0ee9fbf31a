//! Recruiting window configuration repository (single-row table).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::RecruitConfigEntity;
use crate::metrics::QueryTimer;

/// Repository for the singleton recruiting-window document.
#[derive(Clone)]
pub struct RecruitConfigRepository {
    pool: PgPool,
}

impl RecruitConfigRepository {
    /// Creates a new RecruitConfigRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read the window document; `None` until an admin has written one.
    pub async fn get(&self) -> Result<Option<RecruitConfigEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_recruit_config");
        let result = sqlx::query_as::<_, RecruitConfigEntity>(
            r#"
            SELECT is_open, open_at, close_at, message_when_closed, semester, updated_at
            FROM recruit_config
            WHERE id = TRUE
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create or replace the window document (admin writer side).
    pub async fn upsert(
        &self,
        is_open: bool,
        open_at: DateTime<Utc>,
        close_at: DateTime<Utc>,
        message_when_closed: &str,
        semester: &str,
    ) -> Result<RecruitConfigEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_recruit_config");
        let result = sqlx::query_as::<_, RecruitConfigEntity>(
            r#"
            INSERT INTO recruit_config (id, is_open, open_at, close_at, message_when_closed, semester, updated_at)
            VALUES (TRUE, $1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id) DO UPDATE
            SET is_open = $1, open_at = $2, close_at = $3,
                message_when_closed = $4, semester = $5, updated_at = NOW()
            RETURNING is_open, open_at, close_at, message_when_closed, semester, updated_at
            "#,
        )
        .bind(is_open)
        .bind(open_at)
        .bind(close_at)
        .bind(message_when_closed)
        .bind(semester)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
