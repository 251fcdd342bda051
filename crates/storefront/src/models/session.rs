//! Request-scoped authentication state.

use serde::{Deserialize, Serialize};

use corner_shop_core::UserId;

/// Identity proven by a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID, taken from the token's `userId` claim.
    pub id: UserId,
}
