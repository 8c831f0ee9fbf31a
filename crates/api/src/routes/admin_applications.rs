//! Admin review routes: listing, inspection, and status transitions.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminAuth;
use crate::services::admission::{AdmissionError, AdmissionService, StatusUpdateOutcome};
use domain::models::{normalize_email, RecruitApplication};
use persistence::repositories::ApplicationRepository;
use shared::pagination::{decode_cursor, encode_cursor};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for the application listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// List applications, newest first, optionally filtered by status.
///
/// GET /admin/recruit/applications
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let cursor = match &query.cursor {
        Some(cursor) => {
            Some(decode_cursor(cursor).map_err(|_| ApiError::Validation("INVALID_CURSOR".into()))?)
        }
        None => None,
    };

    let rows = ApplicationRepository::new(state.pool.clone())
        .list(
            query.status.as_deref(),
            cursor.as_ref().map(|(at, id)| (*at, id.as_str())),
            limit,
        )
        .await?;

    let next_cursor = if rows.len() == limit as usize {
        rows.last().map(|row| encode_cursor(row.created_at, &row.id))
    } else {
        None
    };

    let data: Vec<RecruitApplication> = rows.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "data": data, "nextCursor": next_cursor })))
}

/// Inspect one application.
///
/// GET /admin/recruit/applications/:id
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecruitApplication>, ApiError> {
    let entity = ApplicationRepository::new(state.pool.clone())
        .find_by_id(&normalize_email(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("NOT_FOUND".into()))?;

    Ok(Json(entity.into()))
}

/// Request body for a status transition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub generation: Option<i32>,
}

/// Transition an application's review status; acceptance mints the member
/// record and discloses the link code exactly once.
///
/// PATCH /admin/recruit/applications/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminAuth>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(status) = request.status else {
        return Err(ApiError::Validation("MISSING_FIELD:status".into()));
    };

    let service = AdmissionService::new(
        state.pool.clone(),
        state.config.security.link_code_secret.clone(),
    );

    match service
        .update_status(&admin.admin_id, &id, &status, request.generation)
        .await
    {
        Ok(StatusUpdateOutcome::Updated) => Ok(Json(json!({ "ok": true }))),
        Ok(StatusUpdateOutcome::Accepted {
            member_id,
            link_code,
        }) => Ok(Json(json!({
            "ok": true,
            "memberId": member_id,
            "linkCode": link_code,
        }))),
        Err(AdmissionError::UnknownStatus(_)) => Err(ApiError::Validation("INVALID_STATUS".into())),
        Err(AdmissionError::MissingGeneration) => {
            Err(ApiError::Validation("INVALID_GENERATION".into()))
        }
        Err(AdmissionError::NotFound) => Err(ApiError::NotFound("NOT_FOUND".into())),
        Err(AdmissionError::Database(e)) => Err(e.into()),
        Err(e) => {
            tracing::error!("Status update failed: {}", e);
            Err(ApiError::Internal("STATUS_UPDATE_FAILED".into()))
        }
    }
}
