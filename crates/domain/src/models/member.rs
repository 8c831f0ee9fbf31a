//! Member record minted by the acceptance transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days a freshly minted link code stays redeemable.
pub const LINK_CODE_TTL_DAYS: i64 = 7;

/// A full member identity created from an accepted application.
///
/// Only the keyed digest of the link code is stored; the plaintext is
/// returned to the accepting admin exactly once and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub department: String,
    pub student_id: String,
    pub role: String,
    pub generation: i32,
    #[serde(skip_serializing)]
    pub link_code_hash: String,
    pub link_code_expires_at: DateTime<Utc>,
    pub link_code_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
