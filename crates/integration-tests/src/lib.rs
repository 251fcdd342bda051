//! Integration tests for Corner Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cs-cli migrate
//! cargo run -p corner-shop-storefront &
//! cargo test -p corner-shop-integration-tests -- --ignored
//! ```
//!
//! The server URL defaults to `http://localhost:5000` and can be changed with
//! `STOREFRONT_BASE_URL`.

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A unique, well-formed email so reruns never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@corner-shop.test", Uuid::new_v4().simple())
}

/// Thin client over the identity endpoints.
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl Default for StorefrontClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StorefrontClient {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: storefront_base_url(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /api/auth/reg`
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request cannot be sent.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> reqwest::Result<Response> {
        self.client
            .post(self.url("/api/auth/reg"))
            .json(&json!({"name": name, "email": email, "password": password}))
            .send()
            .await
    }

    /// `POST /api/auth/log`
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Result<Response> {
        self.client
            .post(self.url("/api/auth/log"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
    }

    /// `GET /api/auth/`, with a bearer token when one is given.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request cannot be sent.
    pub async fn refresh(&self, token: Option<&str>) -> reqwest::Result<Response> {
        let mut request = self.client.get(self.url("/api/auth/"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await
    }

    /// `GET` an arbitrary path.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(path)).send().await
    }
}

/// Split a response into status and JSON body (`Null` for non-JSON bodies).
///
/// # Errors
///
/// Returns the transport error if the body cannot be read.
pub async fn status_and_json(response: Response) -> reqwest::Result<(StatusCode, Value)> {
    let status = response.status();
    let text = response.text().await?;
    Ok((status, serde_json::from_str(&text).unwrap_or(Value::Null)))
}
