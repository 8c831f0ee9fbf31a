//! Fixed-window rate limiting for the public recruiting endpoints.
//!
//! Counters are keyed by `(endpoint class, client key)` and live behind the
//! [`AbuseLimiter`] trait: production binds the shared Postgres counter
//! store so every API process enforces the same windows; the in-memory
//! binding exists for tests only. Windows are fixed, not sliding: a client
//! can burst up to roughly twice the nominal limit across a window
//! boundary, which is the documented tradeoff.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::RateLimitRepository;

/// Endpoint classes with independent budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateClass {
    Apply,
    Login,
}

impl RateClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateClass::Apply => "apply",
            RateClass::Login => "login",
        }
    }
}

/// Post-consume state of one fixed window.
#[derive(Debug, Clone, Copy)]
pub struct WindowState {
    pub count: i64,
    pub reset_at: DateTime<Utc>,
}

/// A shared request counter over fixed windows.
#[async_trait]
pub trait AbuseLimiter: Send + Sync {
    /// Counts one request against `(class, key)` and returns the running
    /// count plus the window's reset time.
    async fn consume(
        &self,
        class: &str,
        key: &str,
        window: Duration,
    ) -> Result<WindowState, ApiError>;
}

/// Production limiter backed by the shared counter store.
pub struct SharedAbuseLimiter {
    repo: RateLimitRepository,
}

impl SharedAbuseLimiter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: RateLimitRepository::new(pool),
        }
    }
}

#[async_trait]
impl AbuseLimiter for SharedAbuseLimiter {
    async fn consume(
        &self,
        class: &str,
        key: &str,
        window: Duration,
    ) -> Result<WindowState, ApiError> {
        let window_secs = window.num_milliseconds() as f64 / 1000.0;
        let state = self
            .repo
            .consume(class, key, window_secs)
            .await
            .map_err(|e| {
                tracing::error!("Rate-limit counter store error: {}", e);
                ApiError::Internal("RATE_LIMIT_UNAVAILABLE".into())
            })?;

        Ok(WindowState {
            count: state.count,
            reset_at: state.window_started_at + window,
        })
    }
}

/// In-memory limiter for tests. Not suitable for production: counters kept
/// in process memory under-enforce limits once horizontally scaled.
#[derive(Default)]
pub struct MemoryAbuseLimiter {
    windows: Mutex<HashMap<(String, String), (i64, DateTime<Utc>)>>,
}

impl MemoryAbuseLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AbuseLimiter for MemoryAbuseLimiter {
    async fn consume(
        &self,
        class: &str,
        key: &str,
        window: Duration,
    ) -> Result<WindowState, ApiError> {
        let now = Utc::now();
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| ApiError::Internal("RATE_LIMIT_POISONED".into()))?;

        let slot = windows
            .entry((class.to_string(), key.to_string()))
            .or_insert((0, now));
        if slot.1 + window <= now {
            *slot = (0, now);
        }
        slot.0 += 1;

        Ok(WindowState {
            count: slot.0,
            reset_at: slot.1 + window,
        })
    }
}

/// Middleware for the apply endpoint class (5 requests / window).
pub async fn limit_apply(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let limit = state.config.security.apply_limit;
    enforce(&state, RateClass::Apply, limit, req, next).await
}

/// Middleware for the login endpoint class (20 requests / window).
pub async fn limit_login(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let limit = state.config.security.login_limit;
    enforce(&state, RateClass::Login, limit, req, next).await
}

async fn enforce(
    state: &AppState,
    class: RateClass,
    limit: u32,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let window = Duration::seconds(state.config.security.rate_limit_window_secs as i64);

    match state.limiter.consume(class.as_str(), &key, window).await {
        Ok(window_state) if window_state.count <= i64::from(limit) => next.run(req).await,
        Ok(window_state) => {
            tracing::warn!(
                class = class.as_str(),
                key = %key,
                count = window_state.count,
                limit = limit,
                "Rate limit exceeded"
            );
            ApiError::RateLimited {
                retry_after_secs: retry_after_secs(window_state.reset_at, Utc::now()),
            }
            .into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Derives the client key: an explicit visitor identifier when supplied,
/// otherwise the forwarded or peer network address.
fn client_key(req: &Request<Body>) -> String {
    if let Some(visitor) = req.headers().get("X-Visitor-Id").and_then(|v| v.to_str().ok()) {
        let visitor = visitor.trim();
        if !visitor.is_empty() {
            return visitor.to_string();
        }
    }

    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Seconds until the window resets, rounded up, never below 1.
fn retry_after_secs(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (reset_at - now).num_milliseconds().max(0);
    (((millis + 999) / 1000).max(1)) as u64
}
