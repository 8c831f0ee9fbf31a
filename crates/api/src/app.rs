use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    limit_apply, limit_login, metrics_handler, metrics_middleware, require_admin, trace_id,
    AbuseLimiter, SharedAbuseLimiter,
};
use crate::routes::{admin_applications, applications, auth, health, recruit_config};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub limiter: Arc<dyn AbuseLimiter>,
}

/// Builds the application with the production (shared-store) rate limiter.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let limiter = Arc::new(SharedAbuseLimiter::new(pool.clone()));
    create_app_with_limiter(config, pool, limiter)
}

/// Builds the application with an explicit limiter binding; tests inject
/// the in-memory one here.
pub fn create_app_with_limiter(
    config: Config,
    pool: PgPool,
    limiter: Arc<dyn AbuseLimiter>,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Rate-limited public endpoints; each class keeps its own budget.
    let apply_routes = Router::new()
        .route("/recruit/applications", post(applications::apply))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit_apply));

    let login_routes = Router::new()
        .route("/recruit/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit_login));

    // Session-authenticated endpoints; the SessionAuth extractor resolves
    // the bearer token inside each handler.
    let session_routes = Router::new()
        .route(
            "/recruit/me",
            get(applications::me).patch(applications::update_me),
        )
        .route("/recruit/logout", post(auth::logout));

    // Public endpoints (no authentication required)
    let public_routes = Router::new()
        .route("/recruit/reset-password", post(auth::reset_password))
        .route("/recruit/config", get(recruit_config::get_config))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    // Admin endpoints (configured admin key required)
    let admin_routes = Router::new()
        .route(
            "/admin/recruit/applications",
            get(admin_applications::list_applications),
        )
        .route(
            "/admin/recruit/applications/:id",
            get(admin_applications::get_application),
        )
        .route(
            "/admin/recruit/applications/:id/status",
            patch(admin_applications::update_status),
        )
        .route("/admin/recruit/config", put(recruit_config::update_config))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(apply_routes)
        .merge(login_routes)
        .merge(session_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
