//! Dialogue session states.

use core::fmt;
use std::str::FromStr;

/// A stored state token that does not name any [`SessionState`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown session state: {0:?}")]
pub struct UnknownSessionState(pub String);

/// The position of a chat in the shopping flow.
///
/// Persisted per chat as its token (`START`, `HANDLE_MENU`, ...), so the
/// token spelling is part of the stored format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Show the catalog menu.
    Start,
    /// Waiting for a product or the cart to be picked from the menu.
    HandleMenu,
    /// Showing a product card with quantity buttons.
    HandleDescription,
    /// Showing the cart with remove, menu and checkout buttons.
    HandleCart,
    /// Waiting for the customer to type an email address.
    HandleWaitingEmail,
}

impl SessionState {
    /// Every state, in flow order.
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::HandleMenu,
        Self::HandleDescription,
        Self::HandleCart,
        Self::HandleWaitingEmail,
    ];

    /// The token stored in the session store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::HandleMenu => "HANDLE_MENU",
            Self::HandleDescription => "HANDLE_DESCRIPTION",
            Self::HandleCart => "HANDLE_CART",
            Self::HandleWaitingEmail => "HANDLE_WAITING_EMAIL",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionState {
    type Err = UnknownSessionState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownSessionState(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_parse_back() {
        for state in SessionState::ALL {
            assert_eq!(state.as_str().parse::<SessionState>().unwrap(), state);
        }
    }

    #[test]
    fn test_stored_tokens_are_stable() {
        assert_eq!(SessionState::Start.to_string(), "START");
        assert_eq!(
            SessionState::HandleWaitingEmail.to_string(),
            "HANDLE_WAITING_EMAIL"
        );
    }

    #[test]
    fn test_unknown_token() {
        let err = "HANDLE_PAYMENT".parse::<SessionState>().unwrap_err();
        assert_eq!(err, UnknownSessionState("HANDLE_PAYMENT".to_string()));
        assert!("handle_menu".parse::<SessionState>().is_err());
    }
}
