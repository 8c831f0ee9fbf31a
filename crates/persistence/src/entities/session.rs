//! Recruit session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the recruit_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<SessionEntity> for domain::models::RecruitSession {
    fn from(entity: SessionEntity) -> Self {
        Self {
            token: entity.token,
            email: entity.email,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            expires_at: entity.expires_at,
        }
    }
}
