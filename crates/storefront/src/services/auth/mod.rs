//! Authentication service.
//!
//! Registration, password login and session refresh. Every operation is a
//! straight validate, look up, compute, respond sequence over an
//! [`IdentityStore`].

mod error;
pub mod validation;

pub use error::AuthError;
pub use validation::FieldError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use corner_shop_core::{AuthResponse, UserId};

use crate::db::{IdentityStore, RepositoryError};
use crate::models::user::{NewUser, User};
use crate::services::token::TokenIssuer;

use validation::{validate_login, validate_registration};

/// Raw registration fields as they arrived in the request body.
#[derive(Debug, Default)]
pub struct RegisterInput<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub is_admin: bool,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn IdentityStore,
    tokens: &'a TokenIssuer,
    allow_admin_signup: bool,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn IdentityStore, tokens: &'a TokenIssuer) -> Self {
        Self {
            store,
            tokens,
            allow_admin_signup: false,
        }
    }

    /// Let registration honor the requested admin flag.
    #[must_use]
    pub const fn allow_admin_signup(mut self, allow: bool) -> Self {
        self.allow_admin_signup = allow;
        self
    }

    /// Register a new user and their empty basket.
    ///
    /// No token is issued; the client logs in afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the email or password is invalid.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput<'_>) -> Result<User, AuthError> {
        let reg = validate_registration(input.name, input.email, input.password)?;

        if self.store.find_user_by_email(&reg.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        if input.is_admin && !self.allow_admin_signup {
            tracing::warn!(email = %reg.email, "ignoring isAdmin on public registration");
        }

        let new_user = NewUser {
            name: reg.name.to_owned(),
            email: reg.email,
            password_hash: hash_password(reg.password)?,
            is_admin: input.is_admin && self.allow_admin_signup,
        };

        let user = self
            .store
            .create_user_with_basket(new_user)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the body is malformed.
    /// Returns `AuthError::UserNotFound` if no user has that email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    #[instrument(skip(self, email, password))]
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthResponse, AuthError> {
        let login = validate_login(email, password)?;

        let (user, password_hash) = self
            .store
            .find_password_hash(&login.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(login.password, &password_hash)?;

        tracing::info!(user_id = %user.id, "user logged in");
        self.session_for(&user).await
    }

    /// Issue a fresh session for the user a verified token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user no longer exists.
    /// Returns `AuthError::Repository` if the basket cannot be loaded.
    #[instrument(skip(self))]
    pub async fn refresh(&self, user_id: UserId) -> Result<AuthResponse, AuthError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.session_for(&user).await
    }

    async fn session_for(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self.tokens.issue(user.id)?;
        let basket = self.store.basket_lines(user.id).await?;

        Ok(AuthResponse::new(token, user.summary(), basket, user.is_admin))
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
