//! Integration tests for the admin review surface: listing, status
//! transitions, the acceptance transaction, and window administration.
//!
//! These tests require a running PostgreSQL instance. Set
//! TEST_DATABASE_URL or use the local development database.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_request, create_test_app, create_test_pool, open_window, outbox_count,
    parse_response_body, run_migrations, submit_application, test_config, window_lock,
    TestApplicant, TEST_LINK_SECRET,
};
use serde_json::json;
use tower::ServiceExt;

fn status_uri(email: &str) -> String {
    format!("/admin/recruit/applications/{}/status", email)
}

// ============================================================================
// Admin authentication
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_key() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    // No key.
    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method(Method::GET)
                .uri("/admin/recruit/applications")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "ADMIN_REQUIRED");

    // Wrong key.
    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method(Method::GET)
                .uri("/admin/recruit/applications")
                .header("X-Admin-Key", "rp_not_a_real_key")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Status transitions
// ============================================================================

#[tokio::test]
async fn test_status_update_reviewing() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    open_window(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let applicant = TestApplicant::new();
    submit_application(&app, &applicant).await;

    let response = app
        .clone()
        .oneshot(admin_request(
            Method::PATCH,
            &status_uri(&applicant.email),
            Some(json!({ "status": "reviewing" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "ok": true }));

    // Reflected on the admin read, with the updating admin recorded.
    let response = app
        .clone()
        .oneshot(admin_request(
            Method::GET,
            &format!("/admin/recruit/applications/{}", applicant.email),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "reviewing");
    assert_eq!(body["statusUpdatedBy"], "admin-test");
    assert!(body.get("passwordHash").is_none());

    // Non-decision transitions do not enqueue decision mail.
    assert_eq!(
        outbox_count(&pool, "decision", &applicant.contact_email).await,
        0
    );
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    open_window(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let applicant = TestApplicant::new();
    submit_application(&app, &applicant).await;

    // "hold" belongs to the application-level taxonomy, not the admin one.
    for status in ["hold", "submitted", "unknown"] {
        let response = app
            .clone()
            .oneshot(admin_request(
                Method::PATCH,
                &status_uri(&applicant.email),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_response_body(response).await;
        assert_eq!(body["error"], "INVALID_STATUS");
    }
}

#[tokio::test]
async fn test_status_update_unknown_application_is_404() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let response = app
        .clone()
        .oneshot(admin_request(
            Method::PATCH,
            &status_uri("ghost@univ.test"),
            Some(json!({ "status": "reviewing" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Acceptance
// ============================================================================

#[tokio::test]
async fn test_accept_requires_positive_generation() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    open_window(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let applicant = TestApplicant::new();
    submit_application(&app, &applicant).await;

    for body in [json!({ "status": "accepted" }), json!({ "status": "accepted", "generation": 0 })] {
        let response = app
            .clone()
            .oneshot(admin_request(
                Method::PATCH,
                &status_uri(&applicant.email),
                Some(body),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_response_body(response).await;
        assert_eq!(body["error"], "INVALID_GENERATION");
    }

    // No member was minted along the way.
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members WHERE email = $1")
        .bind(&applicant.email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 0);
}

#[tokio::test]
async fn test_accept_mints_member_and_discloses_code_once() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    open_window(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let applicant = TestApplicant::new();
    submit_application(&app, &applicant).await;

    let response = app
        .clone()
        .oneshot(admin_request(
            Method::PATCH,
            &status_uri(&applicant.email),
            Some(json!({ "status": "accepted", "generation": 12 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["ok"], true);

    let member_id = body["memberId"].as_str().expect("memberId").to_string();
    let link_code = body["linkCode"].as_str().expect("linkCode").to_string();

    // 8 hex characters formatted XXXX-XXXX.
    assert_eq!(link_code.len(), 9);
    assert_eq!(&link_code[4..5], "-");
    assert!(link_code
        .chars()
        .filter(|c| *c != '-')
        .all(|c| c.is_ascii_hexdigit()));

    // Exactly one member, carrying the keyed digest of the disclosed code
    // and a seven-day redemption window; never the plaintext.
    let rows: Vec<(String, String, i32, String, Option<chrono::DateTime<chrono::Utc>>)> =
        sqlx::query_as(
            r#"
            SELECT id::text, role, generation, link_code_hash, link_code_used_at
            FROM members WHERE email = $1
            "#,
        )
        .bind(&applicant.email)
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    let (id, role, generation, stored_digest, used_at) = rows.into_iter().next().unwrap();
    assert_eq!(id, member_id);
    assert_eq!(role, "member");
    assert_eq!(generation, 12);
    assert_eq!(
        stored_digest,
        shared::crypto::link_code_digest(TEST_LINK_SECRET, &link_code)
    );
    assert!(used_at.is_none());

    // The application is settled and points at the member.
    let row: (String, Option<uuid::Uuid>) = sqlx::query_as(
        "SELECT status, accepted_member_id FROM recruit_applications WHERE id = $1",
    )
    .bind(&applicant.email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(row.0, "accepted");
    assert_eq!(row.1.unwrap().to_string(), member_id);

    // Accepting again converges on the same member but cannot re-disclose
    // the original plaintext.
    let response = app
        .clone()
        .oneshot(admin_request(
            Method::PATCH,
            &status_uri(&applicant.email),
            Some(json!({ "status": "accepted", "generation": 12 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["memberId"], member_id);
    assert!(body["linkCode"].is_null());

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members WHERE email = $1")
        .bind(&applicant.email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 1, "repeated accepts must not mint a second member");

    // One decision notification across both accepts.
    assert_eq!(
        outbox_count(&pool, "decision", &applicant.contact_email).await,
        1
    );
}

#[tokio::test]
async fn test_reject_enqueues_single_decision() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    open_window(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let applicant = TestApplicant::new();
    submit_application(&app, &applicant).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(admin_request(
                Method::PATCH,
                &status_uri(&applicant.email),
                Some(json!({ "status": "rejected" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(
        outbox_count(&pool, "decision", &applicant.contact_email).await,
        1,
        "the decision notification is one-shot"
    );
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_filters_by_status_and_paginates() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    open_window(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let waitlisted: Vec<TestApplicant> = (0..3).map(|_| TestApplicant::new()).collect();
    for applicant in &waitlisted {
        submit_application(&app, applicant).await;
        let response = app
            .clone()
            .oneshot(admin_request(
                Method::PATCH,
                &status_uri(&applicant.email),
                Some(json!({ "status": "waitlist" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Page through the waitlist one at a time.
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(cursor) => format!(
                "/admin/recruit/applications?status=waitlist&limit=1&cursor={}",
                cursor
            ),
            None => "/admin/recruit/applications?status=waitlist&limit=1".to_string(),
        };
        let response = app
            .clone()
            .oneshot(admin_request(Method::GET, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response).await;

        let page = body["data"].as_array().unwrap();
        assert!(page.len() <= 1);
        for entry in page {
            assert_eq!(entry["status"], "waitlist");
            assert!(entry.get("passwordHash").is_none());
            seen.push(entry["id"].as_str().unwrap().to_string());
        }

        match body["nextCursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    // Every waitlisted applicant from this test shows up exactly once.
    for applicant in &waitlisted {
        assert_eq!(
            seen.iter().filter(|id| **id == applicant.email).count(),
            1,
            "{} should appear exactly once",
            applicant.email
        );
    }
}

#[tokio::test]
async fn test_list_rejects_bad_cursor() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let response = app
        .clone()
        .oneshot(admin_request(
            Method::GET,
            "/admin/recruit/applications?cursor=!!!not-a-cursor",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "INVALID_CURSOR");
}

// ============================================================================
// Window administration
// ============================================================================

#[tokio::test]
async fn test_config_write_reflects_on_public_read() {
    let _window = window_lock().await;
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let response = app
        .clone()
        .oneshot(admin_request(
            Method::PUT,
            "/admin/recruit/config",
            Some(json!({
                "isOpen": true,
                "openAt": "2026-08-01T00:00:00Z",
                "closeAt": "2026-09-01T00:00:00Z",
                "messageWhenClosed": "See you next semester.",
                "semester": "2026-fall",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The public read is never gated and serializes ISO-8601 timestamps.
    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method(Method::GET)
                .uri("/recruit/config")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["isOpen"], true);
    assert_eq!(body["semester"], "2026-fall");
    assert_eq!(body["messageWhenClosed"], "See you next semester.");
    assert!(chrono::DateTime::parse_from_rfc3339(body["openAt"].as_str().unwrap()).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(body["closeAt"].as_str().unwrap()).is_ok());

    // Restore a wide-open window for concurrently running tests.
    open_window(&pool).await;
}

#[tokio::test]
async fn test_config_write_rejects_inverted_window() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let response = app
        .clone()
        .oneshot(admin_request(
            Method::PUT,
            "/admin/recruit/config",
            Some(json!({
                "isOpen": true,
                "openAt": "2026-09-01T00:00:00Z",
                "closeAt": "2026-08-01T00:00:00Z",
                "messageWhenClosed": "x",
                "semester": "2026-fall",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "INVALID_WINDOW");
}
