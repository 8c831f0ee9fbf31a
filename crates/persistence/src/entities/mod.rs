//! Database entity definitions.
//!
//! Entities are direct mappings to database rows; domain models are built
//! from them via `From` conversions.

pub mod application;
pub mod member;
pub mod outbox;
pub mod rate_limit;
pub mod recruit_config;
pub mod session;

pub use application::ApplicationEntity;
pub use member::MemberEntity;
pub use outbox::OutboxMessageEntity;
pub use rate_limit::RateLimitWindow;
pub use recruit_config::RecruitConfigEntity;
pub use session::SessionEntity;
