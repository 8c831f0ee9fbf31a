//! Login, logout, and password-reset routes.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::services::auth::{AuthError, AuthService};
use persistence::repositories::SessionRepository;

/// Request body for login. Fields are optional so a malformed body gets
/// the same generic answer as bad credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Applicant login.
///
/// POST /recruit/login
///
/// Rate limited upstream. Never reveals whether the email is registered:
/// unknown email and wrong password are the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::Unauthorized("INVALID_CREDENTIALS".into()));
    };

    match AuthService::new(state.pool.clone()).login(&email, &password).await {
        Ok(success) => {
            info!(expires_at = %success.expires_at, "Session issued");
            Ok(Json(json!({ "success": true, "token": success.token })))
        }
        Err(AuthError::InvalidCredentials) => {
            Err(ApiError::Unauthorized("INVALID_CREDENTIALS".into()))
        }
        Err(AuthError::Locked) => Err(ApiError::Locked("ACCOUNT_LOCKED".into())),
        Err(AuthError::Database(e)) => Err(e.into()),
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            Err(ApiError::Internal("LOGIN_FAILED".into()))
        }
    }
}

/// Invalidate the presented session.
///
/// POST /recruit/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> Result<Json<Value>, ApiError> {
    SessionRepository::new(state.pool.clone())
        .delete(&auth.token)
        .await?;

    info!(application = %auth.email, "Session revoked");
    Ok(Json(json!({ "success": true })))
}

/// Request body for password reset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Self-service password reset.
///
/// POST /recruit/reset-password
///
/// Always answers `200 {success:true}` with an identical shape for known
/// and unknown emails; the work happens (or doesn't) silently.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Json<Value> {
    if let Some(email) = request.email {
        if let Err(e) = AuthService::new(state.pool.clone()).reset_password(&email).await {
            // The uniform response holds even when the reset itself fails.
            tracing::error!("Password reset failed: {}", e);
        }
    }

    Json(json!({ "success": true }))
}
