//! Repository implementations.

pub mod application;
pub mod outbox;
pub mod rate_limit;
pub mod recruit_config;
pub mod session;

pub use application::{AcceptOutcome, ApplicationRepository, NewApplication, ProfilePatch};
pub use outbox::OutboxRepository;
pub use rate_limit::RateLimitRepository;
pub use recruit_config::RecruitConfigRepository;
pub use session::SessionRepository;
