//! Recruit session domain model and token generation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Absolute session lifetime, fixed at issuance. Authenticated use never
/// extends it.
pub const SESSION_TTL_DAYS: i64 = 14;

/// An opaque bearer session for the recruiting surface, distinct from the
/// product's general-purpose JWT auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitSession {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Absent on legacy sessions, which stay valid indefinitely.
    pub expires_at: Option<DateTime<Utc>>,
}

impl RecruitSession {
    /// A session with a past `expires_at` is invalid and must be purged on
    /// first observation; a session without one never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }
}

/// Generates an opaque session token from 32 random bytes (256 bits of
/// entropy), URL-safe base64 encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
