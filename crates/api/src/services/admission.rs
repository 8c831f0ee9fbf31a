//! Admin-driven status transitions, including the acceptance transaction.

use chrono::{Duration, Utc};
use metrics::counter;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use domain::models::{
    normalize_email, AdminReviewStatus, NotificationKind, RecruitApplication, LINK_CODE_TTL_DAYS,
};
use domain::services::notification::DecisionPayload;
use persistence::repositories::{AcceptOutcome, ApplicationRepository, OutboxRepository};
use shared::crypto::{generate_link_code, link_code_digest};

/// Errors from the admission flows.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Status outside the admin review taxonomy.
    #[error("Unknown review status: {0}")]
    UnknownStatus(String),

    /// Acceptance requires a positive generation.
    #[error("Acceptance requires a positive generation")]
    MissingGeneration,

    #[error("Application not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Result of an admin status update.
#[derive(Debug, Clone)]
pub enum StatusUpdateOutcome {
    /// Plain merge-update for every status except acceptance.
    Updated,
    /// Acceptance: the member id, plus the plaintext link code when a
    /// member was minted in this call. A repeated accept yields the same
    /// member with `link_code: None`; the original secret is gone and is
    /// never reconstructed.
    Accepted {
        member_id: Uuid,
        link_code: Option<String>,
    },
}

/// Coordinates the transition of an application into a member record.
pub struct AdmissionService {
    pool: PgPool,
    link_code_secret: String,
}

impl AdmissionService {
    pub fn new(pool: PgPool, link_code_secret: impl Into<String>) -> Self {
        Self {
            pool,
            link_code_secret: link_code_secret.into(),
        }
    }

    /// Applies an admin status transition.
    ///
    /// Acceptance runs as a transaction: the application is re-read under
    /// a row lock, an already-accepted application short-circuits to its
    /// existing member, otherwise the member record is created with the
    /// link-code digest and the application flips to `accepted`
    /// atomically. Decisions (accepted/rejected) enqueue one notification,
    /// guarded by the `decision_email_sent_at` claim.
    pub async fn update_status(
        &self,
        admin_id: &str,
        application_id: &str,
        status: &str,
        generation: Option<i32>,
    ) -> Result<StatusUpdateOutcome, AdmissionError> {
        let status: AdminReviewStatus = status
            .parse()
            .map_err(|_| AdmissionError::UnknownStatus(status.to_string()))?;
        let id = normalize_email(application_id);
        let applications = ApplicationRepository::new(self.pool.clone());

        let outcome = if status == AdminReviewStatus::Accepted {
            let generation = match generation {
                Some(generation) if generation > 0 => generation,
                _ => return Err(AdmissionError::MissingGeneration),
            };

            let link_code = generate_link_code();
            let digest = link_code_digest(&self.link_code_secret, &link_code);
            let expires_at = Utc::now() + Duration::days(LINK_CODE_TTL_DAYS);

            match applications
                .accept(&id, admin_id, generation, &digest, expires_at)
                .await?
            {
                None => return Err(AdmissionError::NotFound),
                Some(AcceptOutcome::Created { member_id }) => {
                    info!(
                        application = %id,
                        member_id = %member_id,
                        generation = generation,
                        admin = %admin_id,
                        "Application accepted, member minted"
                    );
                    counter!("recruit_acceptances_total").increment(1);
                    StatusUpdateOutcome::Accepted {
                        member_id,
                        link_code: Some(link_code),
                    }
                }
                Some(AcceptOutcome::AlreadyAccepted { member_id }) => {
                    info!(
                        application = %id,
                        member_id = %member_id,
                        "Repeated accept; original link code not re-disclosed"
                    );
                    StatusUpdateOutcome::Accepted {
                        member_id,
                        link_code: None,
                    }
                }
            }
        } else {
            if !applications
                .set_status(&id, status.as_str(), admin_id)
                .await?
            {
                return Err(AdmissionError::NotFound);
            }
            info!(application = %id, status = %status, admin = %admin_id, "Status updated");
            StatusUpdateOutcome::Updated
        };

        if status.is_decision() {
            self.enqueue_decision(&applications, &id, status, generation)
                .await;
        }

        Ok(outcome)
    }

    /// One-shot decision notification. Only the caller that claims the
    /// `decision_email_sent_at` stamp enqueues; retries and repeated
    /// accepts find it claimed and do nothing.
    async fn enqueue_decision(
        &self,
        applications: &ApplicationRepository,
        id: &str,
        status: AdminReviewStatus,
        generation: Option<i32>,
    ) {
        match applications.claim_decision_notification(id).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::error!(application = %id, "Failed to claim decision notification: {}", e);
                return;
            }
        }

        let application: RecruitApplication = match applications.find_by_id(id).await {
            Ok(Some(entity)) => entity.into(),
            Ok(None) => return,
            Err(e) => {
                tracing::error!(application = %id, "Failed to load application: {}", e);
                return;
            }
        };

        let payload =
            match serde_json::to_value(DecisionPayload::new(status.as_str(), generation, Utc::now()))
            {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!("Failed to serialize decision payload: {}", e);
                    return;
                }
            };

        if let Err(e) = OutboxRepository::new(self.pool.clone())
            .enqueue(
                NotificationKind::Decision.as_str(),
                application.notification_address(),
                payload,
            )
            .await
        {
            tracing::error!(application = %id, "Failed to enqueue decision notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    // The acceptance transaction and its idempotency are covered by the
    // admin integration tests under crates/api/tests.
}
