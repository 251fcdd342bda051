//! Public user view shared by the identity service and its clients.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// The user fields returned after login or session refresh.
///
/// Never carries the password hash or the admin flag; the latter travels
/// separately as `isAdmin` on the auth response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
}
