//! Authentication error types.

use thiserror::Error;

use super::validation::FieldError;
use crate::db::RepositoryError;
use crate::services::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request body failed field validation.
    #[error("{message}")]
    Validation {
        errors: Vec<FieldError>,
        message: &'static str,
    },

    /// Email is already registered.
    #[error("email already taken")]
    DuplicateEmail,

    /// No user with the given email or ID.
    #[error("user not found")]
    UserNotFound,

    /// Password does not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token signing or verification error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
