//! The dialogue: a finite-state machine over chat sessions.
//!
//! # Flow
//!
//! 1. An inbound event arrives and the [`DialogueEngine`] resolves the
//!    chat's state (`/start` always resolves to [`SessionState::Start`])
//! 2. The handler bound to that state inspects the event, calls the
//!    commerce API, and returns a [`Reply`]: the next state plus the
//!    outbound actions to perform
//! 3. The engine performs the actions in order, then persists the next
//!    state
//!
//! Any error along the way is logged and the chat keeps its previous state.

mod engine;
pub mod handlers;
pub mod keyboards;
pub mod messages;

pub use engine::{DialogueEngine, START_COMMAND};

use shopbot_core::{OutboundAction, SessionState};

/// What a handler decided for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// State to persist for the chat.
    pub next: SessionState,
    /// Actions to perform, in order.
    pub actions: Vec<OutboundAction>,
}

impl Reply {
    /// Move to `next` without sending anything.
    #[must_use]
    pub const fn silent(next: SessionState) -> Self {
        Self {
            next,
            actions: Vec::new(),
        }
    }

    /// Move to `next` after performing `actions`.
    #[must_use]
    pub const fn new(next: SessionState, actions: Vec<OutboundAction>) -> Self {
        Self { next, actions }
    }
}
