//! HTTP middleware components.

pub mod admin;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod trace_id;

pub use admin::{require_admin, AdminAuth};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{
    limit_apply, limit_login, AbuseLimiter, MemoryAbuseLimiter, SharedAbuseLimiter,
};
pub use trace_id::trace_id;
