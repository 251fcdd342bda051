//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Bodies are JSON: `{"message": ...}`, plus `errors` for validation failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{AuthError, FieldError};

pub const EMAIL_TAKEN: &str = "This email is already taken";
pub const USER_NOT_FOUND: &str = "User not found";
pub const WRONG_PASSWORD: &str = "Incorrect password, please try again";
pub const NOT_AUTHORIZED: &str = "Not authorized";
pub const SERVER_ERROR: &str = "Server error";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong, please try again";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Register or login failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session refresh failed after the bearer token was accepted.
    ///
    /// With `legacy` set the failure is reported with a 200 status, which
    /// older clients rely on.
    #[error("Refresh failed: {source}")]
    RefreshFailed {
        #[source]
        source: AuthError,
        legacy: bool,
    },

    /// Missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    message: &'a str,
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Auth(err) => matches!(
                err,
                AuthError::Token(_) | AuthError::PasswordHash | AuthError::Repository(_)
            ),
            Self::RefreshFailed { .. } => true,
            Self::Unauthorized => false,
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::RefreshFailed { legacy: true, .. } => StatusCode::OK,
            _ if self.is_server_error() => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Auth(AuthError::Validation { errors, message }) => ErrorBody {
                errors: Some(errors.as_slice()),
                message,
            },
            Self::Auth(err) => ErrorBody {
                errors: None,
                message: match err {
                    AuthError::DuplicateEmail => EMAIL_TAKEN,
                    AuthError::UserNotFound => USER_NOT_FOUND,
                    AuthError::InvalidCredentials => WRONG_PASSWORD,
                    _ => SOMETHING_WENT_WRONG,
                },
            },
            Self::RefreshFailed { .. } => ErrorBody {
                errors: None,
                message: SERVER_ERROR,
            },
            Self::Unauthorized => ErrorBody {
                errors: None,
                message: NOT_AUTHORIZED,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
