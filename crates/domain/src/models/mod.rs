//! Recruiting domain models.

pub mod application;
pub mod member;
pub mod outbox;
pub mod recruit_config;
pub mod session;

pub use application::{
    normalize_email, AdminReviewStatus, ApplicationStatus, RecruitApplication,
};
pub use member::{MemberRecord, LINK_CODE_TTL_DAYS};
pub use outbox::{NotificationKind, OutboxMessage, OutboxStatus};
pub use recruit_config::RecruitConfig;
pub use session::{generate_session_token, RecruitSession, SESSION_TTL_DAYS};
