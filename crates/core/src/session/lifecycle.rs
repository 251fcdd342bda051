//! Token persistence around session transitions.

use std::collections::HashMap;

use super::{AuthResponse, Session, SessionAction};

/// Key the auth token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Durable key-value storage on the client (browser `localStorage`, a
/// keychain, a config file).
pub trait TokenStorage {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: String);

    /// Delete a value. Deleting a missing key is a no-op.
    fn remove(&mut self, key: &str);
}

/// In-process [`TokenStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    entries: HashMap<String, String>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A [`Session`] plus the token storage it signs in and out of.
///
/// All state changes still go through the pure reducer; the store only adds
/// the storage writes that have to happen alongside them:
/// - [`SessionStore::sign_in`] saves the token, then dispatches `SetUser`
/// - dispatching `Logout` deletes the token, then resets the session
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    state: Session,
    storage: S,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Start with an empty session.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            state: Session::new(),
            storage,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &Session {
        &self.state
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The persisted auth token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    /// Apply an action, running its storage hook first.
    pub fn dispatch(&mut self, action: SessionAction) {
        if matches!(action, SessionAction::Logout) {
            self.on_logout();
        }
        self.state.apply(action);
    }

    /// Persist the token from a login/refresh response and sign the user in.
    pub fn sign_in(&mut self, response: AuthResponse) {
        let is_admin = response.is_admin();
        self.storage.set(TOKEN_KEY, response.token);
        self.dispatch(SessionAction::set_user(
            response.user,
            response.basket,
            is_admin,
        ));
    }

    /// Sign out: drop the token and reset the session.
    pub fn logout(&mut self) {
        self.dispatch(SessionAction::logout());
    }

    fn on_logout(&mut self) {
        self.storage.remove(TOKEN_KEY);
    }
}
