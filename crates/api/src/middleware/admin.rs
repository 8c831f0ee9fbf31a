//! Admin authentication middleware.
//!
//! The product's admin identities live in the main member service; the
//! recruiting surface only needs a narrow contract: a configured admin key
//! presented via `X-Admin-Key`. Keys are compared by digest.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use shared::crypto::sha256_hex;

/// Authenticated admin identity, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Configured key id, recorded as `status_updated_by` on transitions.
    pub admin_id: String,
}

/// Middleware for admin-only routes. Rejects with 403 when no configured
/// admin key matches; the recruiting surface has no non-admin callers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get("X-Admin-Key")
        .and_then(|v| v.to_str().ok())
        .map(sha256_hex);

    let Some(digest) = presented else {
        return ApiError::Forbidden("ADMIN_REQUIRED".into()).into_response();
    };

    let matched = state
        .config
        .admin
        .api_keys
        .iter()
        .find(|candidate| sha256_hex(&candidate.key) == digest);

    match matched {
        Some(key) => {
            req.extensions_mut().insert(AdminAuth {
                admin_id: key.id.clone(),
            });
            next.run(req).await
        }
        None => ApiError::Forbidden("ADMIN_REQUIRED".into()).into_response(),
    }
}
