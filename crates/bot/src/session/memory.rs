//! Process-local session store.

use std::collections::HashMap;

use shopbot_core::{ChatId, SessionState};
use tokio::sync::RwLock;

use super::{SessionError, SessionStore};

/// Sessions kept in a map; lost on restart.
///
/// Used when no Redis host is configured, and by tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<ChatId, SessionState>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats with a session.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no chat has a session yet.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get(&self, chat_id: ChatId) -> Result<Option<SessionState>, SessionError> {
        Ok(self.sessions.read().await.get(&chat_id).copied())
    }

    async fn set(&self, chat_id: ChatId, state: SessionState) -> Result<(), SessionError> {
        self.sessions.write().await.insert(chat_id, state);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_chat_has_no_session() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get(ChatId::new(1)).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_overwrites_per_chat() {
        let store = InMemorySessionStore::new();
        store.set(ChatId::new(1), SessionState::HandleMenu).await.unwrap();
        store.set(ChatId::new(2), SessionState::HandleCart).await.unwrap();
        store
            .set(ChatId::new(1), SessionState::HandleDescription)
            .await
            .unwrap();

        assert_eq!(
            store.get(ChatId::new(1)).await.unwrap(),
            Some(SessionState::HandleDescription)
        );
        assert_eq!(
            store.get(ChatId::new(2)).await.unwrap(),
            Some(SessionState::HandleCart)
        );
        assert_eq!(store.len().await, 2);
    }
}
