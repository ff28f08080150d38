//! Unified error handling with Sentry integration.
//!
//! Every dialogue turn returns `Result<_, BotError>`. Errors never reach the
//! user: the dispatcher boundary hands them to [`report`], which logs them
//! and captures them to Sentry, and the turn ends without a state change.

use shopbot_core::{ChatId, SessionState};
use thiserror::Error;

use crate::moltin::MoltinError;
use crate::session::SessionError;
use crate::telegram::TelegramError;

/// Application-level error type for one dialogue turn.
#[derive(Debug, Error)]
pub enum BotError {
    /// The chat has no session and did not send `/start`.
    #[error("No session for chat {chat_id}; expected /start")]
    UnknownSession {
        /// Chat that sent the event.
        chat_id: ChatId,
    },

    /// Commerce API operation failed.
    #[error("Commerce error: {0}")]
    Commerce(#[from] MoltinError),

    /// Chat platform operation failed.
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The event kind does not fit the current state.
    #[error("State {state} expects a {expected}, got a {received}")]
    UnexpectedEvent {
        /// State the chat is in.
        state: SessionState,
        /// Event kind the state handles.
        expected: &'static str,
        /// Event kind that arrived.
        received: &'static str,
    },

    /// Callback data that does not have the expected shape.
    #[error("Malformed callback data: {0:?}")]
    MalformedCallback(String),
}

impl BotError {
    /// Whether the error comes from a remote service rather than from the
    /// user's input.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Commerce(_) | Self::Telegram(_) | Self::Session(_))
    }
}

/// Result type alias for `BotError`.
pub type Result<T> = std::result::Result<T, BotError>;

/// Log a failed turn and capture it to Sentry.
///
/// Input errors (no session, wrong event kind, bad callback data) are
/// expected from stale keyboards and typos, so only transport errors are
/// sent to Sentry.
pub fn report(err: &BotError, chat_id: ChatId, state: Option<SessionState>) {
    let state = state.map_or("-", SessionState::as_str);

    if err.is_transport() {
        let event_id = sentry::capture_error(err);
        tracing::error!(
            error = %err,
            chat_id = %chat_id,
            state,
            sentry_event_id = %event_id,
            "Failed to handle update"
        );
    } else {
        tracing::error!(
            error = %err,
            chat_id = %chat_id,
            state,
            "Rejected update"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_error_display() {
        let err = BotError::UnknownSession {
            chat_id: ChatId::new(42),
        };
        assert_eq!(err.to_string(), "No session for chat 42; expected /start");

        let err = BotError::UnexpectedEvent {
            state: SessionState::HandleMenu,
            expected: "callback",
            received: "message",
        };
        assert_eq!(
            err.to_string(),
            "State HANDLE_MENU expects a callback, got a message"
        );
    }

    #[test]
    fn test_transport_classification() {
        assert!(BotError::Commerce(MoltinError::NotFound("x".to_string())).is_transport());
        assert!(!BotError::MalformedCallback("3".to_string()).is_transport());
        assert!(
            !BotError::UnknownSession {
                chat_id: ChatId::new(1)
            }
            .is_transport()
        );
    }
}
