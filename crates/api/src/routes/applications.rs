//! Application submission and self-service profile routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use metrics::counter;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::SessionAuth;
use crate::routes::recruit_config::current_config;
use domain::models::{normalize_email, NotificationKind, RecruitApplication};
use domain::services::notification::ApplicationReceivedPayload;
use persistence::repositories::{
    ApplicationRepository, NewApplication, OutboxRepository, ProfilePatch,
};
use shared::password::hash_password;

/// Required apply fields, checked in order; the first missing one names
/// the rejection.
const REQUIRED_FIELDS: [&str; 10] = [
    "name",
    "email",
    "contactEmail",
    "phone",
    "department",
    "studentId",
    "essayMotivation",
    "essayExperience",
    "essayGoals",
    "password",
];

/// A required field must be a string that survives trimming.
fn required_field(body: &Value, name: &str) -> Result<String, ApiError> {
    match body.get(name).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ApiError::Validation(format!("MISSING_FIELD:{}", name))),
    }
}

fn optional_field(body: &Value, name: &str) -> Option<String> {
    body.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Submit an application.
///
/// POST /recruit/applications
///
/// Gated on the recruiting window and rate limited upstream. The
/// normalized institutional email is the identity key; re-applying under
/// any casing of the same address conflicts.
pub async fn apply(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let config = current_config(&state.pool).await?;
    if !config.is_effectively_open(Utc::now()) {
        return Err(ApiError::Forbidden(config.message_when_closed));
    }

    let mut fields = std::collections::HashMap::new();
    for name in REQUIRED_FIELDS {
        fields.insert(name, required_field(&body, name)?);
    }

    let id = normalize_email(&fields["email"]);
    let applications = ApplicationRepository::new(state.pool.clone());

    if applications.find_by_id(&id).await?.is_some() {
        return Err(ApiError::Conflict("DUPLICATE".into()));
    }

    let password_hash = hash_password(&fields["password"]).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::Internal("HASH_FAILED".into())
    })?;

    let github_url = optional_field(&body, "githubUrl");
    let portfolio_url = optional_field(&body, "portfolioUrl");

    let created = applications
        .create(&NewApplication {
            id: &id,
            name: &fields["name"],
            contact_email: &fields["contactEmail"],
            phone: &fields["phone"],
            department: &fields["department"],
            student_id: &fields["studentId"],
            essay_motivation: &fields["essayMotivation"],
            essay_experience: &fields["essayExperience"],
            essay_goals: &fields["essayGoals"],
            github_url: github_url.as_deref(),
            portfolio_url: portfolio_url.as_deref(),
            password_hash: &password_hash,
        })
        .await
        .map_err(ApiError::from)?;

    let application: RecruitApplication = created.into();

    // A crash between the create and this enqueue loses the confirmation,
    // never the application.
    let payload = serde_json::to_value(ApplicationReceivedPayload::new(
        &application.name,
        &config.semester,
        Utc::now(),
    ))
    .unwrap_or(Value::Null);
    if let Err(e) = OutboxRepository::new(state.pool.clone())
        .enqueue(
            NotificationKind::ApplicationReceived.as_str(),
            application.notification_address(),
            payload,
        )
        .await
    {
        tracing::error!("Failed to enqueue confirmation: {}", e);
    }

    info!(application = %id, "Application submitted");
    counter!("recruit_applications_total").increment(1);

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// Read the caller's own application.
///
/// GET /recruit/me
///
/// `password_hash` and `failed_attempts` never appear in the payload.
pub async fn me(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> Result<Json<RecruitApplication>, ApiError> {
    let entity = ApplicationRepository::new(state.pool.clone())
        .find_by_id(&auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("NOT_FOUND".into()))?;

    Ok(Json(entity.into()))
}

/// Request body for the self-service profile update. Only whitelisted
/// fields exist here; everything else in the body is ignored by serde.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
    pub essay_motivation: Option<String>,
    pub essay_experience: Option<String>,
    pub essay_goals: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub github_url: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub portfolio_url: Option<String>,
}

impl UpdateMeRequest {
    fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            name: self.name,
            contact_email: self.contact_email,
            phone: self.phone,
            department: self.department,
            student_id: self.student_id,
            essay_motivation: self.essay_motivation,
            essay_experience: self.essay_experience,
            essay_goals: self.essay_goals,
            github_url: self.github_url,
            portfolio_url: self.portfolio_url,
        }
    }
}

/// Update the caller's own application while the window is open.
///
/// PATCH /recruit/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: SessionAuth,
    Json(request): Json<UpdateMeRequest>,
) -> Result<Json<Value>, ApiError> {
    let config = current_config(&state.pool).await?;
    if !config.is_effectively_open(Utc::now()) {
        return Err(ApiError::Forbidden(config.message_when_closed));
    }

    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let patch = request.into_patch();
    if patch.is_empty() {
        return Err(ApiError::Validation("NO_FIELDS".into()));
    }

    let updated = ApplicationRepository::new(state.pool.clone())
        .update_profile(&auth.email, &patch)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("NOT_FOUND".into()));
    }

    info!(application = %auth.email, "Profile updated");
    Ok(Json(json!({ "success": true })))
}
