//! Applicant authentication: login with the lockout state machine, and
//! self-service password reset.

use chrono::{Duration, Utc};
use metrics::counter;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use domain::models::{
    generate_session_token, normalize_email, NotificationKind, RecruitApplication,
    SESSION_TTL_DAYS,
};
use domain::services::lockout::{
    lock_expiry, lockout_state, on_failed_attempt, FailureAction, LockoutState,
};
use domain::services::notification::{PasswordResetPayload, TemporaryPasswordPayload};
use persistence::repositories::{ApplicationRepository, OutboxRepository, SessionRepository};
use shared::password::{
    generate_temp_password, hash_password, verify_password, PasswordError, TEMP_PASSWORD_LENGTH,
};

/// Errors from the authentication flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; never distinguished for callers.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The application is locked, or this attempt just locked it.
    #[error("Application locked")]
    Locked,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// A successfully issued session.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Service for applicant login and password reset.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs one login attempt through the lockout state machine.
    ///
    /// Locked applications answer 423 without counting the attempt. A
    /// correct password resets the counters and issues a 14-day session.
    /// A wrong password increments the counter atomically; the attempt
    /// that reaches the threshold replaces the stored credential with a
    /// temporary password, locks for 15 minutes, and enqueues the
    /// temporary-password notification.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let id = normalize_email(email);
        let applications = ApplicationRepository::new(self.pool.clone());

        let Some(entity) = applications.find_by_id(&id).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        let application: RecruitApplication = entity.into();

        let now = Utc::now();
        if let LockoutState::Locked { until } = lockout_state(application.locked_until, now) {
            info!(application = %id, locked_until = %until, "Login rejected while locked");
            return Err(AuthError::Locked);
        }

        if verify_password(password, &application.password_hash)? {
            applications.clear_failures(&id).await?;

            let token = generate_session_token();
            let expires_at = now + Duration::days(SESSION_TTL_DAYS);
            SessionRepository::new(self.pool.clone())
                .create(&token, &id, expires_at)
                .await?;

            counter!("recruit_logins_total", "result" => "success").increment(1);
            return Ok(LoginSuccess { token, expires_at });
        }

        let new_count = applications
            .record_failed_attempt(&id)
            .await?
            .unwrap_or_default();

        match on_failed_attempt(new_count) {
            FailureAction::Count => {
                counter!("recruit_logins_total", "result" => "failure").increment(1);
                Err(AuthError::InvalidCredentials)
            }
            FailureAction::Lock => {
                let temp_password = generate_temp_password(TEMP_PASSWORD_LENGTH);
                let temp_hash = hash_password(&temp_password)?;
                let locked_until = lock_expiry(now);

                applications
                    .lock_with_temp_password(&id, &temp_hash, locked_until)
                    .await?;

                let payload = serde_json::to_value(TemporaryPasswordPayload::new(
                    &temp_password,
                    locked_until,
                    now,
                ))?;
                self.enqueue(
                    NotificationKind::TemporaryPassword,
                    application.notification_address(),
                    payload,
                )
                .await;

                warn!(application = %id, "Application locked after repeated failures");
                counter!("recruit_lockouts_total").increment(1);
                Err(AuthError::Locked)
            }
        }
    }

    /// Self-service reset: for known applications, mint a temporary
    /// credential, replace the stored hash, clear any lock, and enqueue the
    /// reset notification. Unknown emails do nothing; callers answer
    /// identically either way.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let id = normalize_email(email);
        let applications = ApplicationRepository::new(self.pool.clone());

        let Some(entity) = applications.find_by_id(&id).await? else {
            return Ok(());
        };
        let application: RecruitApplication = entity.into();

        let temp_password = generate_temp_password(TEMP_PASSWORD_LENGTH);
        let temp_hash = hash_password(&temp_password)?;
        applications.replace_credential(&id, &temp_hash).await?;

        let payload =
            serde_json::to_value(PasswordResetPayload::new(&temp_password, Utc::now()))?;
        self.enqueue(
            NotificationKind::PasswordReset,
            application.notification_address(),
            payload,
        )
        .await;

        info!(application = %id, "Password reset credential issued");
        Ok(())
    }

    /// Best-effort outbox enqueue. The triggering write already happened;
    /// losing the notification on failure is the documented gap, so the
    /// response does not change.
    async fn enqueue(&self, kind: NotificationKind, to: &str, payload: serde_json::Value) {
        if let Err(e) = OutboxRepository::new(self.pool.clone())
            .enqueue(kind.as_str(), to, payload)
            .await
        {
            tracing::error!(kind = %kind, "Failed to enqueue notification: {}", e);
        }
    }
}
