//! Per-chat session state storage.
//!
//! A session is the single [`SessionState`] token stored under a chat's id.
//! There is no expiry and no transaction spanning a read and the following
//! write: concurrent turns for the same chat are last-write-wins.

mod memory;
mod redis_store;

pub use self::memory::InMemorySessionStore;
pub use self::redis_store::RedisSessionStore;

use std::future::Future;

use shopbot_core::{ChatId, SessionState, UnknownSessionState};
use thiserror::Error;

/// Errors that can occur when reading or writing sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Redis command or connection failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The stored token does not name a known state.
    #[error("Corrupt session: {0}")]
    Corrupt(#[from] UnknownSessionState),
}

/// Key-value store mapping a chat to its dialogue state.
///
/// Uses native async fn in traits (Rust 2024 edition, no `async_trait` macro).
pub trait SessionStore: Send + Sync {
    /// Get the stored state. Returns `None` if the chat has no session.
    fn get(
        &self,
        chat_id: ChatId,
    ) -> impl Future<Output = Result<Option<SessionState>, SessionError>> + Send;

    /// Store a state, overwriting any previous value.
    fn set(
        &self,
        chat_id: ChatId,
        state: SessionState,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}
