//! Business logic services for storefront.
//!
//! - `auth` - Registration, password login and session refresh
//! - `token` - Session token issuing and verification

pub mod auth;
pub mod token;
