//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! cs-cli user create -e ann@example.com -n "Ann" -p hunter2
//! cs-cli user create -e root@example.com -n "Root" -p s3cret --admin
//! ```

use thiserror::Error;

use corner_shop_storefront::config::{self, ConfigError};
use corner_shop_storefront::db::{self, IdentityStore, PgIdentityStore, RepositoryError};
use corner_shop_storefront::models::NewUser;
use corner_shop_storefront::services::auth::validation::validate_registration;
use corner_shop_storefront::services::auth::{AuthError, hash_password};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// Email or password rejected by the registration rules.
    #[error("Invalid user data: {0}")]
    Invalid(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    #[error("Could not create user: {0}")]
    Auth(#[from] AuthError),
}

/// Create a user and their empty basket.
///
/// Applies the same email normalization and password rules as public
/// registration, but may create administrators.
///
/// # Errors
///
/// Returns `UserError` if validation fails, the email is taken, or the
/// database operation fails.
pub async fn create(
    email: &str,
    name: &str,
    password: &str,
    admin: bool,
) -> Result<(), UserError> {
    let reg = validate_registration(Some(name), Some(email), Some(password)).map_err(|e| {
        if let AuthError::Validation { errors, message } = &e {
            let fields: Vec<_> = errors.iter().map(|f| format!("{}: {}", f.param, f.msg)).collect();
            return UserError::Invalid(format!("{message} ({})", fields.join(", ")));
        }
        UserError::Auth(e)
    })?;

    let database_url = config::database_url()?;
    tracing::info!("Connecting to storefront database...");
    let store = PgIdentityStore::new(db::create_pool(&database_url).await?);

    let new_user = NewUser {
        name: reg.name.to_owned(),
        email: reg.email.clone(),
        password_hash: hash_password(reg.password)?,
        is_admin: admin,
    };

    let user = store
        .create_user_with_basket(new_user)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UserExists(reg.email.to_string()),
            other => UserError::Auth(AuthError::Repository(other)),
        })?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        is_admin = user.is_admin,
        "User created"
    );
    Ok(())
}
