//! Typed payloads for outbox notifications.
//!
//! Each payload carries its kind under the `type` key so the delivery
//! worker can pick a template without inspecting the rest of the document.

use crate::models::outbox::NotificationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confirmation sent right after an application is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceivedPayload {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub name: String,
    pub semester: String,
    pub timestamp: DateTime<Utc>,
}

impl ApplicationReceivedPayload {
    pub fn new(name: &str, semester: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::ApplicationReceived,
            name: name.to_string(),
            semester: semester.to_string(),
            timestamp,
        }
    }
}

/// Carries the system-issued temporary password minted on lockout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryPasswordPayload {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub temp_password: String,
    pub locked_until: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl TemporaryPasswordPayload {
    pub fn new(temp_password: &str, locked_until: DateTime<Utc>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::TemporaryPassword,
            temp_password: temp_password.to_string(),
            locked_until,
            timestamp,
        }
    }
}

/// Carries the temporary password minted by a self-service reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetPayload {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub temp_password: String,
    pub timestamp: DateTime<Utc>,
}

impl PasswordResetPayload {
    pub fn new(temp_password: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::PasswordReset,
            temp_password: temp_password.to_string(),
            timestamp,
        }
    }
}

/// Sent once when an application settles as accepted or rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl DecisionPayload {
    pub fn new(status: &str, generation: Option<i32>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::Decision,
            status: status.to_string(),
            generation,
            timestamp,
        }
    }
}
