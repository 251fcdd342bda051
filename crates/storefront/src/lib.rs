//! Corner Shop identity service library.
//!
//! Registration, login and session refresh over an [`db::IdentityStore`],
//! exposed as an axum router. The binary in `main.rs` only loads
//! configuration, connects to `PostgreSQL` and serves [`app::build_app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
