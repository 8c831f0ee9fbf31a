//! Recruit application entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the recruit_applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_email: String,
    pub phone: String,
    pub department: String,
    pub student_id: String,
    pub essay_motivation: String,
    pub essay_experience: String,
    pub essay_goals: String,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub password_hash: String,
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub status: String,
    pub status_updated_by: Option<String>,
    pub accepted_member_id: Option<Uuid>,
    pub decision_email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationEntity> for domain::models::RecruitApplication {
    fn from(entity: ApplicationEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            contact_email: entity.contact_email,
            phone: entity.phone,
            department: entity.department,
            student_id: entity.student_id,
            essay_motivation: entity.essay_motivation,
            essay_experience: entity.essay_experience,
            essay_goals: entity.essay_goals,
            github_url: entity.github_url,
            portfolio_url: entity.portfolio_url,
            password_hash: entity.password_hash,
            failed_attempts: entity.failed_attempts,
            locked_until: entity.locked_until,
            status: entity.status,
            status_updated_by: entity.status_updated_by,
            accepted_member_id: entity.accepted_member_id,
            decision_email_sent_at: entity.decision_email_sent_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
