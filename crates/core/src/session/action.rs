//! Actions understood by the session store.

use serde::{Deserialize, Serialize};

use crate::types::{BasketLine, ProductId, UserSummary};

/// A state transition request for [`Session`](super::Session).
///
/// The serde shape is the client's action contract:
///
/// ```json
/// {"type": "SET_USER", "payload": {...}, "basket": [...], "isAdmin": true}
/// {"type": "LOGOUT"}
/// {"type": "ADD_TO_BASKET", "payload": {"data": {...}, "count": 1}}
/// {"type": "REMOVE_FROM_BASKET", "payload": 42}
/// {"type": "SET_LOADING", "payload": true}
/// ```
///
/// Any other `type` decodes to [`SessionAction::Unknown`], which leaves the
/// session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionAction {
    /// Replace the signed-in user and their basket.
    SetUser {
        #[serde(rename = "payload")]
        user: UserSummary,
        #[serde(default)]
        basket: Vec<BasketLine>,
        #[serde(rename = "isAdmin", default)]
        is_admin: bool,
    },
    /// Forget the user and empty the basket.
    Logout,
    /// Add a product line, merging with an existing line for the same product.
    AddToBasket {
        #[serde(rename = "payload")]
        line: BasketLine,
    },
    /// Drop every line for a product.
    RemoveFromBasket {
        #[serde(rename = "payload")]
        product_id: ProductId,
    },
    /// Toggle the loading flag.
    SetLoading {
        #[serde(rename = "payload")]
        is_loading: bool,
    },
    /// An action this store does not handle.
    #[serde(other)]
    Unknown,
}

impl SessionAction {
    #[must_use]
    pub const fn set_user(user: UserSummary, basket: Vec<BasketLine>, is_admin: bool) -> Self {
        Self::SetUser {
            user,
            basket,
            is_admin,
        }
    }

    #[must_use]
    pub const fn logout() -> Self {
        Self::Logout
    }

    #[must_use]
    pub const fn add_to_basket(line: BasketLine) -> Self {
        Self::AddToBasket { line }
    }

    #[must_use]
    pub const fn remove_from_basket(product_id: ProductId) -> Self {
        Self::RemoveFromBasket { product_id }
    }

    #[must_use]
    pub const fn set_loading(is_loading: bool) -> Self {
        Self::SetLoading { is_loading }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::session::{Session, reduce};

    #[test]
    fn test_decode_remove_from_basket() {
        let action: SessionAction =
            serde_json::from_value(json!({"type": "REMOVE_FROM_BASKET", "payload": 3})).unwrap();
        assert_eq!(action, SessionAction::remove_from_basket(ProductId::new(3)));
    }

    #[test]
    fn test_decode_set_user_without_admin_flag() {
        let action: SessionAction = serde_json::from_value(json!({
            "type": "SET_USER",
            "payload": {"id": 1, "name": "Ann", "email": "ann@example.com"},
            "basket": []
        }))
        .unwrap();

        let SessionAction::SetUser { is_admin, user, .. } = action else {
            panic!("expected SetUser");
        };
        assert!(!is_admin);
        assert_eq!(user.name, "Ann");
    }

    #[test]
    fn test_add_bare_product_ref_twice_merges() {
        let sign_in: SessionAction = serde_json::from_value(json!({
            "type": "SET_USER",
            "payload": {"id": 1, "name": "Ann", "email": "ann@example.com"}
        }))
        .unwrap();
        let add: SessionAction = serde_json::from_value(json!({
            "type": "ADD_TO_BASKET",
            "payload": {"data": {"_id": 1}, "count": 1}
        }))
        .unwrap();

        let session = reduce(Session::new(), sign_in);
        let session = reduce(reduce(session, add.clone()), add);

        assert_eq!(session.basket.len(), 1);
        assert_eq!(session.basket[0].product_id(), ProductId::new(1));
        assert_eq!(session.basket[0].count, 2);
    }

    #[test]
    fn test_decode_unknown_type() {
        let action: SessionAction =
            serde_json::from_value(json!({"type": "SOMETHING_ELSE", "payload": 1})).unwrap();
        assert_eq!(action, SessionAction::Unknown);
    }

    #[test]
    fn test_encode_logout() {
        let json = serde_json::to_value(SessionAction::logout()).unwrap();
        assert_eq!(json, json!({"type": "LOGOUT"}));
    }
}
