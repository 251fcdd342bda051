//! `PostgreSQL` adapter for [`IdentityStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{BasketLine, Email, UserId};

use super::{BasketRepository, IdentityStore, RepositoryError, UserRepository};
use crate::models::user::{NewUser, User};

/// Identity store backed by the `storefront` schema.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        UserRepository::new(&self.pool).get_by_email(email).await
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        UserRepository::new(&self.pool).get_by_id(id).await
    }

    async fn find_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        UserRepository::new(&self.pool).get_password_hash(email).await
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user_with_basket(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let created = UserRepository::insert(&mut *tx, &user).await?;
        let basket_id = BasketRepository::create_for(&mut *tx, created.id).await?;

        tx.commit().await?;

        tracing::debug!(user_id = %created.id, basket_id = %basket_id, "user and basket created");
        Ok(created)
    }

    async fn basket_lines(&self, owner: UserId) -> Result<Vec<BasketLine>, RepositoryError> {
        BasketRepository::new(&self.pool).lines(owner).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
