//! Recruit application domain model and status taxonomies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Normalizes an applicant email into the application identity key:
/// trimmed and lower-cased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A prospective member's application.
///
/// `id` equals the normalized institutional email and is the uniqueness
/// key. `password_hash` and `failed_attempts` are never serialized into
/// response payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitApplication {
    pub id: String,
    pub name: String,
    /// Institutional email; equals `id` once normalized.
    pub email: String,
    pub contact_email: String,
    pub phone: String,
    pub department: String,
    pub student_id: String,
    pub essay_motivation: String,
    pub essay_experience: String,
    pub essay_goals: String,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub status: String,
    pub status_updated_by: Option<String>,
    pub accepted_member_id: Option<Uuid>,
    pub decision_email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecruitApplication {
    /// The email notifications are sent to: the contact address, falling
    /// back to the institutional one when the contact address is blank.
    pub fn notification_address(&self) -> &str {
        if self.contact_email.trim().is_empty() {
            &self.email
        } else {
            &self.contact_email
        }
    }
}

/// Application-level status taxonomy, written by the apply flow.
///
/// The admin review endpoint validates against [`AdminReviewStatus`], which
/// intentionally disagrees with this set on two values (submitted/pending,
/// hold/waitlist). Endpoints each keep their own taxonomy; the stored
/// column is plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Submitted,
    Reviewing,
    Accepted,
    Rejected,
    Hold,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hold => "hold",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "reviewing" => Ok(ApplicationStatus::Reviewing),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hold" => Ok(ApplicationStatus::Hold),
            _ => Err(format!("Invalid application status: {}", s)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin-side review taxonomy, accepted by the status-update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminReviewStatus {
    Pending,
    Reviewing,
    Accepted,
    Rejected,
    Waitlist,
}

impl AdminReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminReviewStatus::Pending => "pending",
            AdminReviewStatus::Reviewing => "reviewing",
            AdminReviewStatus::Accepted => "accepted",
            AdminReviewStatus::Rejected => "rejected",
            AdminReviewStatus::Waitlist => "waitlist",
        }
    }

    /// Whether this transition settles the application and should trigger
    /// the one-shot decision notification.
    pub fn is_decision(&self) -> bool {
        matches!(self, AdminReviewStatus::Accepted | AdminReviewStatus::Rejected)
    }
}

impl FromStr for AdminReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdminReviewStatus::Pending),
            "reviewing" => Ok(AdminReviewStatus::Reviewing),
            "accepted" => Ok(AdminReviewStatus::Accepted),
            "rejected" => Ok(AdminReviewStatus::Rejected),
            "waitlist" => Ok(AdminReviewStatus::Waitlist),
            _ => Err(format!("Invalid review status: {}", s)),
        }
    }
}

impl fmt::Display for AdminReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
