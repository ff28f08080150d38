//! `DialogueEngine`: resolves session state, runs handlers, persists.

use shopbot_core::{InboundEvent, SessionState};
use tracing::{debug, instrument};

use super::handlers;
use crate::error::{BotError, Result, report};
use crate::moltin::CommerceApi;
use crate::session::SessionStore;
use crate::telegram::ChatSender;

/// The only input that resets a session.
pub const START_COMMAND: &str = "/start";

/// Drives the shopping flow for every chat.
///
/// Holds its collaborators explicitly; nothing is read from globals.
#[derive(Debug)]
pub struct DialogueEngine<C, S, St> {
    commerce: C,
    sender: S,
    sessions: St,
}

impl<C, S, St> DialogueEngine<C, S, St>
where
    C: CommerceApi,
    S: ChatSender,
    St: SessionStore,
{
    /// Create an engine from its collaborators.
    #[must_use]
    pub const fn new(commerce: C, sender: S, sessions: St) -> Self {
        Self {
            commerce,
            sender,
            sessions,
        }
    }

    /// The commerce API used by handlers.
    pub const fn commerce(&self) -> &C {
        &self.commerce
    }

    /// The chat sender performing replies.
    pub const fn sender(&self) -> &S {
        &self.sender
    }

    /// The session store.
    pub const fn sessions(&self) -> &St {
        &self.sessions
    }

    /// Handle one event, logging instead of returning errors.
    ///
    /// A failed turn sends nothing further and leaves the chat's stored
    /// state untouched.
    #[instrument(
        skip_all,
        fields(chat_id = %event.chat_id(), user_id = %event.sender().id, kind = event.kind())
    )]
    pub async fn handle(&self, event: InboundEvent) {
        let chat_id = event.chat_id();

        let state = match self.resolve_state(&event).await {
            Ok(state) => state,
            Err(err) => {
                report(&err, chat_id, None);
                return;
            }
        };

        match self.run_turn(state, &event).await {
            Ok(next) => debug!(from = %state, to = %next, "Turn complete"),
            Err(err) => report(&err, chat_id, Some(state)),
        }
    }

    /// Handle one event and return the persisted next state.
    ///
    /// # Errors
    ///
    /// Returns `BotError::UnknownSession` if the chat has no session and
    /// the event is not `/start`, or whatever the handler, the chat sender
    /// or the session store fail with.
    pub async fn process(&self, event: &InboundEvent) -> Result<SessionState> {
        let state = self.resolve_state(event).await?;
        self.run_turn(state, event).await
    }

    /// Work out which handler the event goes to.
    async fn resolve_state(&self, event: &InboundEvent) -> Result<SessionState> {
        if event.user_reply() == START_COMMAND {
            return Ok(SessionState::Start);
        }

        let chat_id = event.chat_id();
        self.sessions
            .get(chat_id)
            .await?
            .ok_or(BotError::UnknownSession { chat_id })
    }

    async fn run_turn(&self, state: SessionState, event: &InboundEvent) -> Result<SessionState> {
        let reply = handlers::dispatch(state, event, &self.commerce).await?;

        for action in &reply.actions {
            self.sender.perform(action).await?;
        }

        self.sessions.set(event.chat_id(), reply.next).await?;
        Ok(reply.next)
    }
}
