//! Corner Shop Core - Shared types and the client session store.
//!
//! This crate provides the types shared by every Corner Shop component:
//! - `storefront` - Identity service (register, login, session refresh)
//! - `cli` - Command-line tools for migrations and management
//! - browser/desktop clients - the [`session`] store they dispatch into
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure state transitions -
//! no I/O, no database access, no HTTP clients. The one side effect the
//! client needs (persisting the auth token) sits behind the
//! [`session::TokenStorage`] trait and is driven by [`session::SessionStore`].
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, prices, products and basket lines
//! - [`session`] - Session/basket reducer, typed actions and lifecycle hooks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod session;
pub mod types;

pub use session::{AuthResponse, Session, SessionAction, SessionStore, reduce};
pub use types::*;
