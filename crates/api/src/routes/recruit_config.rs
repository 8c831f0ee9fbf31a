//! Recruiting window configuration routes.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminAuth;
use domain::models::RecruitConfig;
use persistence::repositories::RecruitConfigRepository;

/// Loads the current window document, falling back to the closed default
/// when no admin has written one yet.
pub(crate) async fn current_config(pool: &PgPool) -> Result<RecruitConfig, ApiError> {
    let entity = RecruitConfigRepository::new(pool.clone())
        .get()
        .await
        .map_err(ApiError::from)?;
    Ok(entity
        .map(Into::into)
        .unwrap_or_else(RecruitConfig::default_closed))
}

/// Public window read.
///
/// GET /recruit/config
///
/// Always permitted; timestamps serialize as ISO-8601. Informational only,
/// never itself gated.
pub async fn get_config(State(state): State<AppState>) -> Result<Json<RecruitConfig>, ApiError> {
    Ok(Json(current_config(&state.pool).await?))
}

/// Request body for the admin window update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    pub is_open: bool,
    pub open_at: DateTime<Utc>,
    pub close_at: DateTime<Utc>,
    #[validate(length(min = 1, message = "Closed message is required"))]
    pub message_when_closed: String,
    pub semester: String,
}

/// Admin window write.
///
/// PUT /admin/recruit/config
pub async fn update_config(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminAuth>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<Json<RecruitConfig>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if request.close_at < request.open_at {
        return Err(ApiError::Validation("INVALID_WINDOW".into()));
    }

    let entity = RecruitConfigRepository::new(state.pool.clone())
        .upsert(
            request.is_open,
            request.open_at,
            request.close_at,
            &request.message_when_closed,
            &request.semester,
        )
        .await?;

    info!(
        admin = %admin.admin_id,
        is_open = request.is_open,
        semester = %request.semester,
        "Recruiting window updated"
    );

    Ok(Json(entity.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_config_request_validation() {
        let request = UpdateConfigRequest {
            is_open: true,
            open_at: Utc::now(),
            close_at: Utc::now(),
            message_when_closed: "Closed until spring.".to_string(),
            semester: "2026-fall".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_config_request_empty_message() {
        let request = UpdateConfigRequest {
            is_open: false,
            open_at: Utc::now(),
            close_at: Utc::now(),
            message_when_closed: String::new(),
            semester: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
