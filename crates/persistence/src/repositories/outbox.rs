//! Outbox repository: durable notification intents.
//!
//! `enqueue` is the whole write surface owned by the pipeline; delivery,
//! retries, and the `sent`/`failed` transitions belong to the external
//! worker that polls `list_pending`.

use sqlx::PgPool;

use crate::entities::OutboxMessageEntity;
use crate::metrics::QueryTimer;
use domain::models::OutboxStatus;

/// Repository for outbox message operations.
#[derive(Clone)]
pub struct OutboxRepository {
    pool: PgPool,
}

impl OutboxRepository {
    /// Creates a new OutboxRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Durably record a notification intent. No delivery I/O happens here;
    /// the message starts out `pending` with zero attempts.
    pub async fn enqueue(
        &self,
        kind: &str,
        recipient: &str,
        payload: serde_json::Value,
    ) -> Result<OutboxMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("enqueue_outbox_message");
        let result = sqlx::query_as::<_, OutboxMessageEntity>(
            r#"
            INSERT INTO outbox_messages (kind, recipient, payload, status, attempts)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id, kind, recipient, payload, status, attempts, last_error,
                      created_at, updated_at
            "#,
        )
        .bind(kind)
        .bind(recipient)
        .bind(payload)
        .bind(OutboxStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Oldest-first pending messages; the delivery worker's poll contract.
    pub async fn list_pending(&self, limit: i64) -> Result<Vec<OutboxMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_outbox_messages");
        let result = sqlx::query_as::<_, OutboxMessageEntity>(
            r#"
            SELECT id, kind, recipient, payload, status, attempts, last_error,
                   created_at, updated_at
            FROM outbox_messages
            WHERE status = $1
            ORDER BY created_at
            LIMIT $2
            "#,
        )
        .bind(OutboxStatus::Pending.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
