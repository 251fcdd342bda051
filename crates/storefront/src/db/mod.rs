//! Database operations for the storefront.
//!
//! # Database: `corner_shop`
//!
//! ## Tables (schema `storefront`)
//!
//! - `users` - Accounts with argon2 password hashes and the admin flag
//! - `products` - Catalog entries referenced by basket lines
//! - `baskets` - One basket per user (`owner_id` is unique)
//! - `basket_lines` - Ordered `(product, count)` entries of a basket
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p corner-shop-cli -- migrate
//! ```
//!
//! # Storage port
//!
//! Request handlers only see [`IdentityStore`]. [`PgIdentityStore`] is the
//! production adapter; [`MemoryIdentityStore`] backs the router tests.

mod baskets;
mod identity;
mod memory;
pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use corner_shop_core::{BasketLine, Email, UserId};

use crate::models::user::{NewUser, User};

pub use baskets::BasketRepository;
pub use identity::PgIdentityStore;
pub use memory::MemoryIdentityStore;
pub use products::{NewProduct, ProductRepository};
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage operations needed by the identity service.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find a user by email.
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Find a user by ID.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Find a user and their stored password hash by email.
    async fn find_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Create a user and their empty basket as one unit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn create_user_with_basket(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Load a user's basket with every line resolved to its product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no basket.
    async fn basket_lines(&self, owner: UserId) -> Result<Vec<BasketLine>, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn IdentityStore) {}
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let err = conflict_or_database(sqlx::Error::RowNotFound, "email");
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }
}
