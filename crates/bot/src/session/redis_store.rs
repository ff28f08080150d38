//! Redis-backed session store.
//!
//! Keys are the bare chat id and values the state token, so sessions
//! written by earlier deployments stay readable.

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use secrecy::ExposeSecret;
use shopbot_core::{ChatId, SessionState};
use tracing::{debug, instrument};

use super::{SessionError, SessionStore};
use crate::config::RedisConfig;

/// Sessions stored in Redis as plain strings.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Redis` if the URL is invalid or the server
    /// cannot be reached.
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &RedisConfig) -> Result<Self, SessionError> {
        let client = redis::Client::open(config.url().expose_secret())?;
        let connection = client.get_multiplexed_async_connection().await?;
        debug!("Connected to Redis");
        Ok(Self { connection })
    }
}

impl SessionStore for RedisSessionStore {
    #[instrument(skip(self), fields(chat_id = %chat_id))]
    async fn get(&self, chat_id: ChatId) -> Result<Option<SessionState>, SessionError> {
        let mut connection = self.connection.clone();
        let token: Option<String> = connection.get(chat_id.get()).await?;
        Ok(token.map(|t| t.parse()).transpose()?)
    }

    #[instrument(skip(self), fields(chat_id = %chat_id, state = %state))]
    async fn set(&self, chat_id: ChatId, state: SessionState) -> Result<(), SessionError> {
        let mut connection = self.connection.clone();
        let () = connection.set(chat_id.get(), state.as_str()).await?;
        Ok(())
    }
}
