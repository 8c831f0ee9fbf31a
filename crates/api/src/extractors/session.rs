//! Recruit session extractor.
//!
//! Resolves the opaque bearer token from the `Authorization` header:
//! missing token → 401 `MISSING_TOKEN`; unknown token → 401
//! `INVALID_SESSION`; expired token → the row is purged synchronously (an
//! expired session is never observed twice) and 401 `INVALID_SESSION`;
//! legacy rows without an expiry always resolve. Resolution bumps
//! `updated_at` in the background but never extends `expires_at`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::Utc;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::RecruitSession;
use persistence::repositories::SessionRepository;

/// Authenticated applicant session.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub token: String,
    /// Normalized application email; equals the application id.
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) if !token.trim().is_empty() => token.trim(),
            _ => return Err(ApiError::Unauthorized("MISSING_TOKEN".into())),
        };

        let repo = SessionRepository::new(state.pool.clone());
        let session: RecruitSession = repo
            .find_by_token(token)
            .await
            .map_err(|e| {
                tracing::error!("Session lookup failed: {}", e);
                ApiError::Internal("SESSION_LOOKUP_FAILED".into())
            })?
            .ok_or_else(|| ApiError::Unauthorized("INVALID_SESSION".into()))?
            .into();

        if session.is_expired(Utc::now()) {
            if let Err(e) = repo.delete(&session.token).await {
                tracing::warn!("Failed to purge expired session: {}", e);
            }
            return Err(ApiError::Unauthorized("INVALID_SESSION".into()));
        }

        // Bump updated_at off the request path; reads never wait on it.
        let pool = state.pool.clone();
        let touched = session.token.clone();
        tokio::spawn(async move {
            if let Err(e) = SessionRepository::new(pool).touch(&touched).await {
                tracing::warn!("Failed to touch session: {}", e);
            }
        });

        Ok(SessionAuth {
            token: session.token,
            email: session.email,
        })
    }
}
