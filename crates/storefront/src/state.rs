//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::IdentityStore;
use crate::services::auth::AuthService;
use crate::services::token::TokenIssuer;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the identity store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn IdentityStore>,
    tokens: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The token issuer is derived from `config.jwt_secret`.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn IdentityStore>) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                tokens,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the identity store.
    #[must_use]
    pub fn store(&self) -> &dyn IdentityStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the session token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Build an auth service borrowing this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store(), self.tokens())
            .allow_admin_signup(self.config().allow_admin_signup)
    }
}
