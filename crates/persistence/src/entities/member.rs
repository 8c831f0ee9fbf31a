//! Member entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the members table.
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub department: String,
    pub student_id: String,
    pub role: String,
    pub generation: i32,
    pub link_code_hash: String,
    pub link_code_expires_at: DateTime<Utc>,
    pub link_code_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberEntity> for domain::models::MemberRecord {
    fn from(entity: MemberEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            phone: entity.phone,
            department: entity.department,
            student_id: entity.student_id,
            role: entity.role,
            generation: entity.generation,
            link_code_hash: entity.link_code_hash,
            link_code_expires_at: entity.link_code_expires_at,
            link_code_used_at: entity.link_code_used_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
