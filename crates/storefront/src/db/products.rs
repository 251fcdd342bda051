//! Product catalog repository.

use sqlx::PgPool;

use corner_shop_core::{Price, Product, ProductId};

use super::{RepositoryError, conflict_or_database};

/// A product that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product with the same name exists.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO storefront.products (name, amount, currency_code, description, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(product.price.amount)
        .bind(product.price.currency_code.as_str())
        .bind(product.description.as_deref())
        .bind(product.image.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "product"))?;

        Ok(Product {
            id: ProductId::new(id),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            image: product.image.clone(),
        })
    }

    /// Look up a product's ID by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_id_by_name(&self, name: &str) -> Result<Option<ProductId>, RepositoryError> {
        let id: Option<i32> =
            sqlx::query_scalar("SELECT id FROM storefront.products WHERE name = $1")
                .bind(name)
                .fetch_optional(self.pool)
                .await?;
        Ok(id.map(ProductId::new))
    }
}
