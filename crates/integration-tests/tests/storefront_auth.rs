//! End-to-end tests for the identity endpoints.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`cs-cli migrate`)
//! - The storefront running (`cargo run -p corner-shop-storefront`)
//!   with `STOREFRONT_RATE_LIMIT=false`
//!
//! Run with: cargo test -p corner-shop-integration-tests -- --ignored

use reqwest::StatusCode;

use corner_shop_core::session::MemoryTokenStorage;
use corner_shop_core::{AuthResponse, SessionStore};
use corner_shop_integration_tests::{StorefrontClient, status_and_json, unique_email};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_health_endpoints() {
    let client = StorefrontClient::new();

    let resp = client.get("/health").await.expect("health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = client.get("/health/ready").await.expect("ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_login_refresh_flow() {
    let client = StorefrontClient::new();
    let email = unique_email("flow");

    let (status, body) = status_and_json(client.register("Ann", &email, "pw").await.expect("reg"))
        .await
        .expect("body");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created");

    let resp = client.login(&email, "pw").await.expect("login");
    assert_eq!(resp.status(), StatusCode::OK);
    let session: AuthResponse = resp.json().await.expect("auth response");
    assert_eq!(session.user.email.as_str(), email);
    assert!(session.basket.is_empty());
    assert!(!session.is_admin());

    let resp = client.refresh(Some(&session.token)).await.expect("refresh");
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed: AuthResponse = resp.json().await.expect("auth response");
    assert_eq!(refreshed.user, session.user);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_client_store_signs_in_with_login_response() {
    let client = StorefrontClient::new();
    let email = unique_email("store");
    client.register("Bo", &email, "pw").await.expect("reg");

    let session: AuthResponse = client
        .login(&email, "pw")
        .await
        .expect("login")
        .json()
        .await
        .expect("auth response");

    let mut store = SessionStore::new(MemoryTokenStorage::default());
    store.sign_in(session.clone());
    assert!(store.state().is_authenticated);
    assert_eq!(store.token().as_deref(), Some(session.token.as_str()));

    store.logout();
    assert!(!store.state().is_authenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_validation_and_duplicates() {
    let client = StorefrontClient::new();
    let email = unique_email("dup");

    let (status, body) = status_and_json(client.register("Ann", &email, "").await.expect("reg"))
        .await
        .expect("body");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid registration data");
    assert_eq!(body["errors"][0]["location"], "body");

    let resp = client.register("Ann", &email, "x").await.expect("reg");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let (status, body) = status_and_json(client.register("Ann", &email, "y").await.expect("reg"))
        .await
        .expect("body");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This email is already taken");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_login_failures() {
    let client = StorefrontClient::new();
    let email = unique_email("fail");
    client.register("Ann", &email, "right").await.expect("reg");

    let (status, body) = status_and_json(client.login(&email, "wrong").await.expect("login"))
        .await
        .expect("body");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect password, please try again");

    let (status, body) = status_and_json(
        client
            .login(&unique_email("nobody"), "right")
            .await
            .expect("login"),
    )
    .await
    .expect("body");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_refresh_rejects_missing_and_forged_tokens() {
    let client = StorefrontClient::new();

    let (status, body) = status_and_json(client.refresh(None).await.expect("refresh"))
        .await
        .expect("body");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");

    let forged = "eyJhbGciOiJIUzI1NiJ9.eyJ1c2VySWQiOjF9.invalid";
    let resp = client.refresh(Some(forged)).await.expect("refresh");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
