//! Basket lines and the merge rules applied when products are added.

use serde::{Deserialize, Serialize};

use super::{Product, ProductId};

/// One basket entry: a product and how many of it.
///
/// Serialized as `{"data": {..product..}, "count": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    /// The product this line refers to.
    pub data: Product,
    /// Quantity. A new line keeps whatever count it arrives with, zero included.
    pub count: u32,
}

impl BasketLine {
    /// A fresh line with a count of one.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            data: product,
            count: 1,
        }
    }

    /// A line with an explicit count.
    #[must_use]
    pub const fn with_count(product: Product, count: u32) -> Self {
        Self {
            data: product,
            count,
        }
    }

    /// ID of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.data.id
    }
}

/// Add a line to a basket.
///
/// The first line with the same product ID has its count bumped by one
/// (the incoming count is ignored). Otherwise the incoming line is appended
/// as given.
pub fn add_line(basket: &mut Vec<BasketLine>, line: BasketLine) {
    let id = line.product_id();
    match basket.iter_mut().find(|existing| existing.product_id() == id) {
        Some(existing) => existing.count = existing.count.saturating_add(1),
        None => basket.push(line),
    }
}

/// Remove every line for `product_id`.
///
/// Returns how many lines were removed.
pub fn remove_product(basket: &mut Vec<BasketLine>, product_id: ProductId) -> usize {
    let before = basket.len();
    basket.retain(|line| line.product_id() != product_id);
    before - basket.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CurrencyCode, Price};

    fn product(id: i32) -> Product {
        Product::new(
            ProductId::new(id),
            format!("product {id}"),
            Price::from_cents(100, CurrencyCode::USD),
        )
    }

    #[test]
    fn test_add_line_appends_new_products_in_order() {
        let mut basket = Vec::new();
        add_line(&mut basket, BasketLine::new(product(1)));
        add_line(&mut basket, BasketLine::new(product(2)));

        let ids: Vec<i32> = basket.iter().map(|l| l.product_id().as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_add_line_bumps_existing_by_one() {
        let mut basket = vec![BasketLine::with_count(product(1), 3)];
        add_line(&mut basket, BasketLine::with_count(product(1), 10));

        assert_eq!(basket.len(), 1);
        assert_eq!(basket[0].count, 4);
    }

    #[test]
    fn test_add_line_bumps_only_first_match() {
        let mut basket = vec![
            BasketLine::with_count(product(1), 1),
            BasketLine::with_count(product(1), 1),
        ];
        add_line(&mut basket, BasketLine::new(product(1)));

        assert_eq!(basket[0].count, 2);
        assert_eq!(basket[1].count, 1);
    }

    #[test]
    fn test_add_line_keeps_incoming_count_when_new() {
        let mut basket = Vec::new();
        add_line(&mut basket, BasketLine::with_count(product(1), 5));
        assert_eq!(basket[0].count, 5);
    }

    #[test]
    fn test_add_line_accepts_zero_count_then_bumps() {
        let mut basket = Vec::new();
        add_line(&mut basket, BasketLine::with_count(product(1), 0));
        assert_eq!(basket[0].count, 0);

        add_line(&mut basket, BasketLine::new(product(1)));
        assert_eq!(basket[0].count, 1);
    }

    #[test]
    fn test_remove_product_removes_all_matches() {
        let mut basket = vec![
            BasketLine::new(product(1)),
            BasketLine::new(product(2)),
            BasketLine::new(product(1)),
        ];
        assert_eq!(remove_product(&mut basket, ProductId::new(1)), 2);
        assert_eq!(basket.len(), 1);
        assert_eq!(remove_product(&mut basket, ProductId::new(1)), 0);
    }

    #[test]
    fn test_line_wire_shape() {
        let line = BasketLine::new(product(7));
        let json = serde_json::to_value(&line).unwrap_or_default();
        assert_eq!(json["data"]["_id"], 7);
        assert_eq!(json["count"], 1);
    }
}
