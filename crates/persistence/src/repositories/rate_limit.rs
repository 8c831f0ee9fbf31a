//! Shared fixed-window rate-limit counters.
//!
//! Counters live in the database so every API process sees the same
//! window state; a process-local counter would under-enforce the limits
//! once the service scales horizontally.

use sqlx::PgPool;

use crate::entities::RateLimitWindow;
use crate::metrics::QueryTimer;

/// Repository for rate-limit counter operations.
#[derive(Clone)]
pub struct RateLimitRepository {
    pool: PgPool,
}

impl RateLimitRepository {
    /// Creates a new RateLimitRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Consume one request from the `(class, key)` window.
    ///
    /// A single atomic upsert either starts a fresh window with count 1
    /// (no row yet, or the stored window has elapsed) or increments the
    /// running count. Returns the post-consume window state.
    pub async fn consume(
        &self,
        class: &str,
        key: &str,
        window_secs: f64,
    ) -> Result<RateLimitWindow, sqlx::Error> {
        let timer = QueryTimer::new("consume_rate_limit");
        let result = sqlx::query_as::<_, RateLimitWindow>(
            r#"
            INSERT INTO rate_limit_counters (class, key, window_started_at, count)
            VALUES ($1, $2, NOW(), 1)
            ON CONFLICT (class, key) DO UPDATE
            SET count = CASE
                    WHEN rate_limit_counters.window_started_at <= NOW() - make_interval(secs => $3)
                    THEN 1
                    ELSE rate_limit_counters.count + 1
                END,
                window_started_at = CASE
                    WHEN rate_limit_counters.window_started_at <= NOW() - make_interval(secs => $3)
                    THEN NOW()
                    ELSE rate_limit_counters.window_started_at
                END
            RETURNING count, window_started_at
            "#,
        )
        .bind(class)
        .bind(key)
        .bind(window_secs)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
