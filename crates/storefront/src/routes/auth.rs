//! Identity endpoints: register, login and session refresh.
//!
//! Bodies are JSON. A body that does not parse is treated like an empty
//! one, so the client gets field errors rather than a framework rejection.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use corner_shop_core::AuthResponse;

use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::services::auth::RegisterInput;
use crate::state::AppState;

pub const USER_CREATED: &str = "User created";

/// Registration request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn body_or_default<T: Default>(body: std::result::Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable request body");
            T::default()
        }
    }
}

/// `POST /api/auth/reg`
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let req = body_or_default(body);

    state
        .auth()
        .register(RegisterInput {
            name: req.name.as_deref(),
            email: req.email.as_deref(),
            password: req.password.as_deref(),
            is_admin: req.is_admin,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: USER_CREATED,
        }),
    ))
}

/// `POST /api/auth/log`
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let req = body_or_default(body);

    let session = state
        .auth()
        .login(req.email.as_deref(), req.password.as_deref())
        .await?;

    set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
    Ok(Json(session))
}

/// `GET /api/auth/`
///
/// Re-issues the token and reloads the basket for the bearer's user.
pub async fn refresh(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<AuthResponse>> {
    let session = state
        .auth()
        .refresh(current.id)
        .await
        .map_err(|source| AppError::RefreshFailed {
            source,
            legacy: state.config().legacy_refresh_errors,
        })?;

    set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
    Ok(Json(session))
}
