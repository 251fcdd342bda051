//! Successful login / refresh payload.

use serde::{Deserialize, Serialize};

use crate::types::{BasketLine, UserSummary};

/// Body returned by the identity service after login or session refresh.
///
/// `isAdmin` is only present (and `true`) for administrators; admins also get
/// a greeting `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Signed session token.
    pub token: String,
    pub user: UserSummary,
    #[serde(default)]
    pub basket: Vec<BasketLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl AuthResponse {
    /// Greeting attached to administrator responses.
    pub const ADMIN_MESSAGE: &'static str = "Admin signed in";

    /// Build a response, adding the admin flag and greeting only for admins.
    #[must_use]
    pub fn new(token: String, user: UserSummary, basket: Vec<BasketLine>, is_admin: bool) -> Self {
        Self {
            message: is_admin.then(|| Self::ADMIN_MESSAGE.to_owned()),
            token,
            user,
            basket,
            is_admin: is_admin.then_some(true),
        }
    }

    /// Whether the response marks the user as an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}
