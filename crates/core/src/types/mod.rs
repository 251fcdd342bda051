//! Core types for Corner Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod basket;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use basket::{BasketLine, add_line, remove_product};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use product::Product;
pub use user::UserSummary;
