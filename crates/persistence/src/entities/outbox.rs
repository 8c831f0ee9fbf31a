//! Outbox message entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the outbox_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct OutboxMessageEntity {
    pub id: Uuid,
    pub kind: String,
    pub recipient: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OutboxMessageEntity> for domain::models::OutboxMessage {
    fn from(entity: OutboxMessageEntity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            to: entity.recipient,
            payload: entity.payload,
            status: entity.status,
            attempts: entity.attempts,
            last_error: entity.last_error,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
