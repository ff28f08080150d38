//! Moltin client-credentials authentication.
//!
//! The access token lives inside a [`TokenProvider`] owned by the client
//! instead of in process-wide state.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::MoltinError;
use crate::config::MoltinConfig;

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Access token obtained from the Moltin OAuth endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Bearer token for API requests.
    pub value: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

impl AccessToken {
    /// Check if the token has expired, or will within the safety margin.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }

    /// Same as [`Self::is_expired`] for an explicit clock reading.
    #[must_use]
    pub const fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at - EXPIRY_MARGIN_SECS
    }
}

/// Response from `POST /oauth/access_token`.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Absolute expiry as a unix timestamp.
    #[serde(default)]
    expires: Option<i64>,
    /// Token lifetime in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, now: i64) -> Result<AccessToken, MoltinError> {
        let expires_at = self
            .expires
            .or_else(|| self.expires_in.map(|secs| now + secs))
            .ok_or_else(|| MoltinError::Auth("token response has no expiry".to_string()))?;

        Ok(AccessToken {
            value: SecretString::from(self.access_token),
            expires_at,
        })
    }
}

/// Hands out a valid access token, fetching a new one when needed.
pub struct TokenProvider {
    endpoint: String,
    client_id: String,
    client_secret: SecretString,
    token: RwLock<Option<AccessToken>>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Create a provider for the configured API.
    #[must_use]
    pub fn new(config: &MoltinConfig) -> Self {
        Self {
            endpoint: format!("{}/oauth/access_token", config.api_url),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: RwLock::new(None),
        }
    }

    /// Return the cached token, fetching a fresh one if it is missing or
    /// about to expire.
    ///
    /// # Errors
    ///
    /// Returns `MoltinError::Auth` if the OAuth endpoint rejects the
    /// credentials, or `MoltinError::Http` on network failures.
    pub async fn valid_token(&self, http: &reqwest::Client) -> Result<SecretString, MoltinError> {
        if let Some(token) = self.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.value.clone());
        }

        let mut guard = self.token.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.value.clone());
        }

        let token = self.authenticate(http).await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        *self.token.write().await = None;
    }

    #[instrument(skip(self, http), fields(client_id = %self.client_id))]
    async fn authenticate(&self, http: &reqwest::Client) -> Result<AccessToken, MoltinError> {
        let now = chrono::Utc::now().timestamp();

        let response = http
            .post(&self.endpoint)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MoltinError::Auth(format!(
                "HTTP {status}: {}",
                error_text.chars().take(200).collect::<String>()
            )));
        }

        let token = response.json::<TokenResponse>().await?.into_token(now)?;
        debug!(expires_at = token.expires_at, "Obtained Moltin access token");
        Ok(token)
    }
}
