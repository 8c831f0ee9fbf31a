//! Rate-limit counter row mapping.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The state of one fixed window after a consume: the running count and
/// when the window started.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RateLimitWindow {
    pub count: i64,
    pub window_started_at: DateTime<Utc>,
}
