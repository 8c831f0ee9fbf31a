//! Recruit config entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the single-row recruit_config table.
#[derive(Debug, Clone, FromRow)]
pub struct RecruitConfigEntity {
    pub is_open: bool,
    pub open_at: DateTime<Utc>,
    pub close_at: DateTime<Utc>,
    pub message_when_closed: String,
    pub semester: String,
    pub updated_at: DateTime<Utc>,
}

impl From<RecruitConfigEntity> for domain::models::RecruitConfig {
    fn from(entity: RecruitConfigEntity) -> Self {
        Self {
            is_open: entity.is_open,
            open_at: entity.open_at,
            close_at: entity.close_at,
            message_when_closed: entity.message_when_closed,
            semester: entity.semester,
            updated_at: entity.updated_at,
        }
    }
}
