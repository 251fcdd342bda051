//! In-memory adapter for [`IdentityStore`].
//!
//! Used by router tests and for running the service without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use corner_shop_core::{BasketLine, Email, Price, Product, ProductId, UserId, add_line};

use super::{IdentityStore, RepositoryError};
use crate::models::user::{NewUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<(User, String)>,
    baskets: HashMap<UserId, Vec<BasketLine>>,
    products: HashMap<ProductId, Product>,
    next_user_id: i32,
    next_product_id: i32,
}

/// Identity store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    /// Add a catalog product and return it with its assigned ID.
    pub async fn insert_product(&self, name: &str, price: Price) -> Product {
        let mut tables = self.tables.write().await;
        tables.next_product_id += 1;
        let product = Product::new(ProductId::new(tables.next_product_id), name, price);
        tables.products.insert(product.id, product.clone());
        product
    }

    /// Put a product into a user's basket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no basket or the
    /// product does not exist.
    pub async fn add_basket_line(
        &self,
        owner: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get(&product)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        let basket = tables
            .baskets
            .get_mut(&owner)
            .ok_or(RepositoryError::NotFound)?;
        add_line(basket, BasketLine::new(product));
        Ok(())
    }

    /// Drop a user's basket, leaving the account in place.
    pub async fn remove_basket(&self, owner: UserId) {
        self.tables.write().await.baskets.remove(&owner);
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| &u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|(u, _)| &u.email == email).cloned())
    }

    async fn create_user_with_basket(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(tables.next_user_id),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        };

        tables.baskets.insert(created.id, Vec::new());
        tables.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn basket_lines(&self, owner: UserId) -> Result<Vec<BasketLine>, RepositoryError> {
        self.check_available()?;
        self.tables
            .read()
            .await
            .baskets
            .get(&owner)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use corner_shop_core::CurrencyCode;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_owned(),
            email: Email::parse(email).expect("valid email"),
            password_hash: "hash".to_owned(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_empty_basket() {
        let store = MemoryIdentityStore::new();
        let a = store
            .create_user_with_basket(new_user("a@x.io"))
            .await
            .expect("create a");
        let b = store
            .create_user_with_basket(new_user("b@x.io"))
            .await
            .expect("create b");

        assert_ne!(a.id, b.id);
        assert!(store.basket_lines(a.id).await.expect("basket").is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryIdentityStore::new();
        store
            .create_user_with_basket(new_user("a@x.io"))
            .await
            .expect("first");
        let err = store
            .create_user_with_basket(new_user("a@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_basket_lines_merge_repeated_products() {
        let store = MemoryIdentityStore::new();
        let user = store
            .create_user_with_basket(new_user("a@x.io"))
            .await
            .expect("create");
        let tea = store
            .insert_product("Tea", Price::from_cents(450, CurrencyCode::EUR))
            .await;

        store.add_basket_line(user.id, tea.id).await.expect("add");
        store.add_basket_line(user.id, tea.id).await.expect("add");

        let lines = store.basket_lines(user.id).await.expect("lines");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].count, 2);
    }

    #[tokio::test]
    async fn test_missing_basket_is_not_found() {
        let store = MemoryIdentityStore::new();
        let user = store
            .create_user_with_basket(new_user("a@x.io"))
            .await
            .expect("create");
        store.remove_basket(user.id).await;

        let err = store.basket_lines(user.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryIdentityStore::new();
        store.set_unavailable(true);
        assert!(store.ping().await.is_err());
        assert!(store.find_user_by_id(UserId::new(1)).await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
