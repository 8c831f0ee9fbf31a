//! Recruiting window configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton recruiting-window document. Read by every gated endpoint,
/// written only by admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitConfig {
    pub is_open: bool,
    pub open_at: DateTime<Utc>,
    pub close_at: DateTime<Utc>,
    pub message_when_closed: String,
    pub semester: String,
    pub updated_at: DateTime<Utc>,
}

impl RecruitConfig {
    /// The gate: the flag must be set AND `now` must fall inside the
    /// `[open_at, close_at]` window.
    pub fn is_effectively_open(&self, now: DateTime<Utc>) -> bool {
        self.is_open && self.open_at <= now && now <= self.close_at
    }

    /// The document served when no config row exists yet; the gate treats
    /// missing config as closed.
    pub fn default_closed() -> Self {
        RecruitConfig {
            is_open: false,
            open_at: DateTime::<Utc>::UNIX_EPOCH,
            close_at: DateTime::<Utc>::UNIX_EPOCH,
            message_when_closed: "Recruiting is currently closed.".to_string(),
            semester: String::new(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}
