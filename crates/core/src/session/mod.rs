//! Client session and basket store.
//!
//! [`Session`] holds who is signed in, the admin and loading flags, and the
//! basket. It changes only through [`SessionAction`]s applied by [`reduce`]
//! (or [`Session::apply`]), which is pure and never fails.
//!
//! Persisting the auth token is not the reducer's job: [`SessionStore`]
//! wraps a session together with a [`TokenStorage`] and runs the token
//! hooks around each dispatch.
//!
//! # State machine
//!
//! States are {signed out, signed in} x {idle, loading}. The initial state is
//! signed out, idle, with an empty basket. There is no terminal state.
//!
//! A signed-out session never holds a user or basket lines: `Logout` clears
//! both, and basket actions are ignored until `SetUser` signs someone in.

mod action;
mod lifecycle;
mod response;

pub use action::SessionAction;
pub use lifecycle::{MemoryTokenStorage, SessionStore, TOKEN_KEY, TokenStorage};
pub use response::AuthResponse;

use serde::{Deserialize, Serialize};

use crate::types::basket::{add_line, remove_product};
use crate::types::{BasketLine, ProductId, UserSummary};

/// The client's view of the signed-in user and their basket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub current_user: Option<UserSummary>,
    #[serde(rename = "isAuth")]
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub is_loading: bool,
    pub basket: Vec<BasketLine>,
}

impl Session {
    /// An empty, signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action in place.
    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::SetUser {
                user,
                basket,
                is_admin,
            } => {
                self.current_user = Some(user);
                self.is_authenticated = true;
                self.is_admin = is_admin;
                self.basket = basket;
            }
            SessionAction::Logout => {
                self.current_user = None;
                self.is_authenticated = false;
                self.is_admin = false;
                self.basket.clear();
            }
            SessionAction::AddToBasket { line } => {
                if self.is_authenticated {
                    add_line(&mut self.basket, line);
                }
            }
            SessionAction::RemoveFromBasket { product_id } => {
                remove_product(&mut self.basket, product_id);
            }
            SessionAction::SetLoading { is_loading } => self.is_loading = is_loading,
            SessionAction::Unknown => {}
        }
    }

    /// Total number of items in the basket (sum of line counts).
    #[must_use]
    pub fn basket_len(&self) -> u32 {
        self.basket
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.count))
    }

    /// The basket line for a product, if any.
    #[must_use]
    pub fn line_for(&self, product_id: ProductId) -> Option<&BasketLine> {
        self.basket
            .iter()
            .find(|line| line.product_id() == product_id)
    }
}

/// Compute the next session from the current one and an action.
#[must_use]
pub fn reduce(mut state: Session, action: SessionAction) -> Session {
    state.apply(action);
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{CurrencyCode, Email, Price, Product, UserId};

    fn user() -> UserSummary {
        UserSummary {
            id: UserId::new(1),
            name: "Ann".to_owned(),
            email: Email::parse("ann@example.com").unwrap(),
        }
    }

    fn line(id: i32, count: u32) -> BasketLine {
        BasketLine::with_count(
            Product::new(
                ProductId::new(id),
                format!("p{id}"),
                Price::from_cents(250, CurrencyCode::USD),
            ),
            count,
        )
    }

    fn signed_in() -> Session {
        reduce(Session::new(), SessionAction::set_user(user(), vec![], false))
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        assert!(!session.is_authenticated);
        assert!(!session.is_admin);
        assert!(!session.is_loading);
        assert!(session.current_user.is_none());
        assert!(session.basket.is_empty());
    }

    #[test]
    fn test_set_user_replaces_everything() {
        let session = reduce(
            signed_in(),
            SessionAction::add_to_basket(line(9, 1)),
        );
        let session = reduce(
            session,
            SessionAction::set_user(user(), vec![line(1, 2)], true),
        );

        assert!(session.is_authenticated);
        assert!(session.is_admin);
        assert_eq!(session.basket, vec![line(1, 2)]);
        assert_eq!(session.current_user, Some(user()));
    }

    #[test]
    fn test_add_to_empty_basket_appends_payload() {
        let session = reduce(signed_in(), SessionAction::add_to_basket(line(1, 1)));
        assert_eq!(session.basket, vec![line(1, 1)]);
    }

    #[test]
    fn test_adding_same_product_twice_yields_count_two() {
        let session = reduce(signed_in(), SessionAction::add_to_basket(line(1, 1)));
        let session = reduce(session, SessionAction::add_to_basket(line(1, 1)));
        assert_eq!(session.basket, vec![line(1, 2)]);
    }

    #[test]
    fn test_new_line_is_stored_verbatim() {
        let session = reduce(signed_in(), SessionAction::add_to_basket(line(1, 1)));
        let session = reduce(session, SessionAction::add_to_basket(line(2, 4)));
        assert_eq!(session.basket[1], line(2, 4));
    }

    #[test]
    fn test_basket_actions_ignored_while_signed_out() {
        let session = reduce(Session::new(), SessionAction::add_to_basket(line(1, 1)));
        assert!(session.basket.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let session = reduce(signed_in(), SessionAction::add_to_basket(line(1, 1)));
        let session = reduce(session, SessionAction::add_to_basket(line(2, 1)));

        let once = reduce(session, SessionAction::remove_from_basket(ProductId::new(1)));
        let twice = reduce(
            once.clone(),
            SessionAction::remove_from_basket(ProductId::new(1)),
        );
        assert_eq!(once, twice);
        assert_eq!(twice.basket, vec![line(2, 1)]);
    }

    #[test]
    fn test_logout_resets_identity_and_basket_but_not_loading() {
        let session = reduce(
            Session::new(),
            SessionAction::set_user(user(), vec![line(1, 3)], true),
        );
        let session = reduce(session, SessionAction::set_loading(true));
        let session = reduce(session, SessionAction::logout());

        assert!(!session.is_authenticated);
        assert!(!session.is_admin);
        assert!(session.current_user.is_none());
        assert!(session.basket.is_empty());
        assert!(session.is_loading);
    }

    #[test]
    fn test_unknown_action_is_identity() {
        let session = reduce(signed_in(), SessionAction::add_to_basket(line(1, 1)));
        assert_eq!(reduce(session.clone(), SessionAction::Unknown), session);
    }

    #[test]
    fn test_basket_len_and_line_for() {
        let session = reduce(
            Session::new(),
            SessionAction::set_user(user(), vec![line(1, 2), line(2, 3)], false),
        );
        assert_eq!(session.basket_len(), 5);
        assert_eq!(session.line_for(ProductId::new(2)).map(|l| l.count), Some(3));
        assert!(session.line_for(ProductId::new(3)).is_none());
    }

    #[test]
    fn test_session_wire_shape() {
        let json = serde_json::to_value(Session::new()).unwrap();
        assert_eq!(json["isAuth"], false);
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["isLoading"], false);
        assert!(json["currentUser"].is_null());
    }

    fn action_strategy() -> impl Strategy<Value = SessionAction> {
        prop_oneof![
            (any::<bool>(), prop::collection::vec((1..5i32, 1..4u32), 0..4)).prop_map(
                |(is_admin, lines)| {
                    SessionAction::set_user(
                        user(),
                        lines.into_iter().map(|(id, count)| line(id, count)).collect(),
                        is_admin,
                    )
                }
            ),
            Just(SessionAction::logout()),
            (1..5i32).prop_map(|id| SessionAction::add_to_basket(line(id, 1))),
            (1..5i32).prop_map(|id| SessionAction::remove_from_basket(ProductId::new(id))),
            any::<bool>().prop_map(SessionAction::set_loading),
            Just(SessionAction::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn prop_signed_out_sessions_are_empty(
            actions in prop::collection::vec(action_strategy(), 0..40)
        ) {
            let mut session = Session::new();
            for action in actions {
                session.apply(action);
                if !session.is_authenticated {
                    prop_assert!(session.current_user.is_none());
                    prop_assert!(session.basket.is_empty());
                    prop_assert!(!session.is_admin);
                }
            }
        }

        #[test]
        fn prop_adds_never_duplicate_product_lines(
            ids in prop::collection::vec(1..6i32, 0..30)
        ) {
            let mut session = signed_in();
            for id in &ids {
                session.apply(SessionAction::add_to_basket(line(*id, 1)));
            }

            let mut seen: Vec<ProductId> =
                session.basket.iter().map(BasketLine::product_id).collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), total);
            prop_assert_eq!(session.basket_len() as usize, ids.len());
        }

        #[test]
        fn prop_logout_always_clears(
            actions in prop::collection::vec(action_strategy(), 0..20)
        ) {
            let session = actions.into_iter().fold(Session::new(), reduce);
            let session = reduce(session, SessionAction::logout());
            prop_assert!(session.basket.is_empty());
            prop_assert!(!session.is_authenticated);
            prop_assert!(!session.is_admin);
        }
    }
}
