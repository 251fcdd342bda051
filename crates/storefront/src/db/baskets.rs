//! Basket repository.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};

use corner_shop_core::{BasketId, BasketLine, CurrencyCode, Price, Product, ProductId, UserId};

use super::RepositoryError;

#[derive(Debug, FromRow)]
struct BasketLineRow {
    count: i32,
    product_id: i32,
    name: String,
    amount: Decimal,
    currency_code: String,
    description: Option<String>,
    image: Option<String>,
}

impl TryFrom<BasketLineRow> for BasketLine {
    type Error = RepositoryError;

    fn try_from(row: BasketLineRow) -> Result<Self, Self::Error> {
        let count = u32::try_from(row.count).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative basket line count: {}", row.count))
        })?;
        let currency_code: CurrencyCode = row
            .currency_code
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        let mut product = Product::new(
            ProductId::new(row.product_id),
            row.name,
            Price::new(row.amount, currency_code),
        );
        product.description = row.description;
        product.image = row.image;

        Ok(Self::with_count(product, count))
    }
}

/// Repository for baskets and their lines.
pub struct BasketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketRepository<'a> {
    /// Create a new basket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an empty basket for `owner` on an open connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_for(
        conn: &mut PgConnection,
        owner: UserId,
    ) -> Result<BasketId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO storefront.baskets (owner_id)
            VALUES ($1)
            RETURNING id
            ",
        )
        .bind(owner.as_i32())
        .fetch_one(conn)
        .await?;

        Ok(BasketId::new(id))
    }

    /// Load the lines of `owner`'s basket in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no basket.
    /// Returns `RepositoryError::DataCorruption` for unreadable line data.
    pub async fn lines(&self, owner: UserId) -> Result<Vec<BasketLine>, RepositoryError> {
        let basket_id: Option<i32> =
            sqlx::query_scalar("SELECT id FROM storefront.baskets WHERE owner_id = $1")
                .bind(owner.as_i32())
                .fetch_optional(self.pool)
                .await?;

        let Some(basket_id) = basket_id else {
            return Err(RepositoryError::NotFound);
        };

        let rows = sqlx::query_as::<_, BasketLineRow>(
            r"
            SELECT bl.count, p.id AS product_id, p.name, p.amount, p.currency_code,
                   p.description, p.image
            FROM storefront.basket_lines bl
            JOIN storefront.products p ON p.id = bl.product_id
            WHERE bl.basket_id = $1
            ORDER BY bl.position, bl.id
            ",
        )
        .bind(basket_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(BasketLine::try_from).collect()
    }

    /// Append a product to `owner`'s basket, or bump its count if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no basket.
    pub async fn add_product(
        &self,
        owner: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO storefront.basket_lines AS line (basket_id, product_id, count, position)
            SELECT b.id, $2, 1,
                   COALESCE((SELECT MAX(position) + 1 FROM storefront.basket_lines
                             WHERE basket_id = b.id), 0)
            FROM storefront.baskets b
            WHERE b.owner_id = $1
            ON CONFLICT (basket_id, product_id)
            DO UPDATE SET count = line.count + 1
            ",
        )
        .bind(owner.as_i32())
        .bind(product.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
