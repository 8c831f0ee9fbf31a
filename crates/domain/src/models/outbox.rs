//! Outbox message model: durable notification intents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Delivery state of an outbox message. The pipeline only ever writes
/// `Pending`; the external delivery worker owns the other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboxStatus {
    Pending,
    Sent,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Sent => "sent",
            OutboxStatus::Failed => "failed",
        }
    }
}

impl FromStr for OutboxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OutboxStatus::Pending),
            "sent" => Ok(OutboxStatus::Sent),
            "failed" => Ok(OutboxStatus::Failed),
            _ => Err(format!("Invalid outbox status: {}", s)),
        }
    }
}

impl fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification kinds the pipeline enqueues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationReceived,
    TemporaryPassword,
    PasswordReset,
    Decision,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ApplicationReceived => "application_received",
            NotificationKind::TemporaryPassword => "temporary_password",
            NotificationKind::PasswordReset => "password_reset",
            NotificationKind::Decision => "decision",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A durably recorded notification intent. Enqueueing never performs
/// delivery I/O; request latency stays decoupled from the mail provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxMessage {
    pub id: Uuid,
    pub kind: String,
    pub to: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [OutboxStatus::Pending, OutboxStatus::Sent, OutboxStatus::Failed] {
            assert_eq!(OutboxStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(OutboxStatus::from_str("queued").is_err());
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            NotificationKind::ApplicationReceived.as_str(),
            "application_received"
        );
        assert_eq!(
            NotificationKind::TemporaryPassword.as_str(),
            "temporary_password"
        );
        assert_eq!(NotificationKind::PasswordReset.as_str(), "password_reset");
        assert_eq!(NotificationKind::Decision.as_str(), "decision");
    }

    #[test]
    fn test_kind_serde_matches_as_str() {
        let json = serde_json::to_value(NotificationKind::TemporaryPassword).unwrap();
        assert_eq!(json, "temporary_password");
    }
}
