//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (identity store reachable)
//!
//! # Identity API
//! POST /api/auth/reg           - Register (201, no token)
//! POST /api/auth/log           - Login (token, user, basket)
//! GET  /api/auth/              - Refresh session (bearer token required)
//! ```

pub mod auth;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the identity API router.
///
/// With `rate_limit` set, register/login get the strict per-IP limiter and
/// refresh gets the relaxed one.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let mut credentials = Router::new()
        .route("/api/auth/reg", post(auth::register))
        .route("/api/auth/log", post(auth::login));

    let mut session = Router::new()
        .route("/api/auth/", get(auth::refresh))
        .route("/api/auth", get(auth::refresh));

    if rate_limit {
        match (auth_rate_limiter(), api_rate_limiter()) {
            (Some(strict), Some(relaxed)) => {
                credentials = credentials.layer(strict);
                session = session.layer(relaxed);
            }
            _ => tracing::warn!("rate limiter quota rejected, serving without limits"),
        }
    }

    credentials.merge(session)
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth_routes(rate_limit))
}
