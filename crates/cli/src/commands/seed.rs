//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Green tea
//!     price: "4.50"
//!     currency: EUR
//!     description: Loose leaf, 100 g
//!     image: /img/green-tea.jpg
//!   - name: Honey
//!     price: "7.00"
//! baskets:
//!   - email: ann@example.com
//!     products: [Green tea, Honey, Green tea]
//! ```
//!
//! Products whose name already exists are skipped. Basket entries append in
//! order, so a repeated product raises that line's count.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use corner_shop_core::{CurrencyCode, Email, Price};
use corner_shop_storefront::config;
use corner_shop_storefront::db::{
    self, BasketRepository, NewProduct, ProductRepository, RepositoryError, UserRepository,
};

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    #[serde(default)]
    pub baskets: Vec<BasketSeed>,
}

/// One catalog product.
#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub price: Decimal,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Products to put into an existing user's basket.
#[derive(Debug, Deserialize)]
pub struct BasketSeed {
    pub email: String,
    pub products: Vec<String>,
}

impl ProductSeed {
    fn to_new_product(&self) -> Result<NewProduct, String> {
        let currency = match &self.currency {
            Some(code) => code.parse::<CurrencyCode>().map_err(|e| e.to_string())?,
            None => CurrencyCode::default(),
        };
        if self.price.is_sign_negative() {
            return Err(format!("negative price for {}", self.name));
        }
        Ok(NewProduct {
            name: self.name.clone(),
            price: Price::new(self.price, currency),
            description: self.description.clone(),
            image: self.image.clone(),
        })
    }
}

/// Check a parsed seed file before touching the database.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut names = std::collections::HashSet::new();

    for product in &seed.products {
        if product.name.trim().is_empty() {
            errors.push("product with empty name".to_owned());
        }
        if !names.insert(product.name.as_str()) {
            errors.push(format!("duplicate product: {}", product.name));
        }
        if let Err(e) = product.to_new_product() {
            errors.push(e);
        }
    }
    for basket in &seed.baskets {
        if Email::parse_normalized(&basket.email).is_err() {
            errors.push(format!("invalid basket email: {}", basket.email));
        }
    }
    errors
}

/// Seed products (and baskets) from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation fails,
/// or database operations fail.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed file");
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let errors = validate(&seed);
    if !errors.is_empty() {
        for err in &errors {
            warn!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(&config::database_url()?).await?;
    info!("Connected to database");

    let catalog = ProductRepository::new(&pool);
    let (mut inserted, mut skipped) = (0_usize, 0_usize);
    for product in &seed.products {
        match catalog.create(&product.to_new_product()?).await {
            Ok(created) => {
                info!(
                    id = %created.id,
                    name = %created.name,
                    price = %created.price,
                    "Inserted product"
                );
                inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    let users = UserRepository::new(&pool);
    let baskets = BasketRepository::new(&pool);
    let mut lines = 0_usize;
    for basket in &seed.baskets {
        let email = Email::parse_normalized(&basket.email)?;
        let Some(owner) = users.get_by_email(&email).await? else {
            warn!(email = %email, "No such user, skipping basket");
            continue;
        };
        for name in &basket.products {
            let Some(product) = catalog.find_id_by_name(name).await? else {
                warn!(product = %name, "No such product, skipping");
                continue;
            };
            baskets.add_product(owner.id, product).await?;
            lines += 1;
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!("  Products skipped (already exist): {skipped}");
    info!("  Basket additions: {lines}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
products:
  - name: Green tea
    price: "4.50"
    currency: EUR
  - name: Honey
    price: "7.00"
baskets:
  - email: Ann@Example.com
    products: [Green tea, Green tea]
"#;

    #[test]
    fn test_parses_sample() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).expect("yaml");
        assert_eq!(seed.products.len(), 2);
        assert_eq!(seed.baskets[0].products.len(), 2);
        assert!(validate(&seed).is_empty());

        let honey = seed.products[1].to_new_product().expect("product");
        assert_eq!(honey.price.currency_code, CurrencyCode::USD);
        assert_eq!(honey.price.amount, Decimal::new(700, 2));
    }

    #[test]
    fn test_validation_catches_bad_entries() {
        let seed: SeedFile = serde_yaml::from_str(
            r#"
products:
  - name: Tea
    price: "1.00"
    currency: XYZ
  - name: Tea
    price: "-2"
baskets:
  - email: nope
    products: []
"#,
        )
        .expect("yaml");

        let errors = validate(&seed);
        assert_eq!(errors.len(), 4, "{errors:?}");
    }
}
