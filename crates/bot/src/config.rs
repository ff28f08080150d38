//! Bot configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TELEGRAM_API_TOKEN` - Bot token issued by `@BotFather`
//! - `MOLTIN_CLIENT_ID` - Moltin API client ID
//! - `MOLTIN_CLIENT_SECRET` - Moltin API client secret
//!
//! ## Optional
//! - `MOLTIN_API_URL` - Commerce API base URL (default: <https://api.moltin.com>)
//! - `DATABASE_HOST` - Redis host for session state (unset: in-memory sessions)
//! - `DATABASE_PORT` - Redis port (default: 6379)
//! - `DATABASE_PASSWORD` - Redis password
//! - `TELEGRAM_ADMIN_CHAT_ID` - Chat that receives warning/error alerts
//!   (`TELEGRAM_CHAT_ID` is accepted as a fallback)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use shopbot_core::ChatId;
use thiserror::Error;

const DEFAULT_MOLTIN_API_URL: &str = "https://api.moltin.com";
const DEFAULT_REDIS_PORT: u16 = 6379;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Bot application configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API configuration
    pub telegram: TelegramConfig,
    /// Moltin commerce API configuration
    pub moltin: MoltinConfig,
    /// Redis session store; `None` keeps sessions in memory
    pub redis: Option<RedisConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Telegram Bot API configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token
    pub token: SecretString,
    /// Chat receiving log alerts
    pub admin_chat_id: Option<ChatId>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("admin_chat_id", &self.admin_chat_id)
            .finish()
    }
}

/// Moltin commerce API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct MoltinConfig {
    /// API base URL without trailing slash
    pub api_url: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
}

impl std::fmt::Debug for MoltinConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoltinConfig")
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Redis connection settings.
#[derive(Clone)]
pub struct RedisConfig {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Password for `AUTH`
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RedisConfig {
    /// Connection URL for the `redis` crate.
    ///
    /// Contains the password, so it is returned as a secret.
    #[must_use]
    pub fn url(&self) -> SecretString {
        let url = match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/",
                urlencoding::encode(password.expose_secret()),
                self.host,
                self.port
            ),
            None => format!("redis://{}:{}/", self.host, self.port),
        };
        SecretString::from(url)
    }
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let telegram = TelegramConfig::from_env()?;
        let moltin = MoltinConfig::from_env()?;
        let redis = RedisConfig::from_env()?;

        Ok(Self {
            telegram,
            moltin,
            redis,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }
}

impl TelegramConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let admin_chat_id = match get_optional_env("TELEGRAM_ADMIN_CHAT_ID") {
            Some(value) => Some(parse_chat_id("TELEGRAM_ADMIN_CHAT_ID", &value)?),
            None => get_optional_env("TELEGRAM_CHAT_ID")
                .map(|value| parse_chat_id("TELEGRAM_CHAT_ID", &value))
                .transpose()?,
        };

        Ok(Self {
            token: get_validated_secret("TELEGRAM_API_TOKEN")?,
            admin_chat_id,
        })
    }
}

impl MoltinConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_env_or_default("MOLTIN_API_URL", DEFAULT_MOLTIN_API_URL)
                .trim_end_matches('/')
                .to_string(),
            client_id: get_required_env("MOLTIN_CLIENT_ID")?,
            client_secret: get_validated_secret("MOLTIN_CLIENT_SECRET")?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(host) = get_optional_env("DATABASE_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port: parse_env_or_default("DATABASE_PORT", DEFAULT_REDIS_PORT)?,
            password: get_optional_env("DATABASE_PASSWORD")
                .filter(|p| !p.is_empty())
                .map(SecretString::from),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_chat_id(key: &str, value: &str) -> Result<ChatId, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .map(ChatId::new)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys and bot tokens are randomly generated
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the credential issued by the provider."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_bot_token_shape_passes() {
        let result =
            validate_secret_strength("7311845520:AAF3kq9ZxW2vBn8mLp4TtRyUe1oIcGdHsJ0", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_placeholder_rejected() {
        let result = validate_secret_strength("your-bot-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));

        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_low_entropy_rejected() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_parse_chat_id() {
        assert_eq!(
            parse_chat_id("X", "-1001234567890").unwrap(),
            ChatId::new(-1_001_234_567_890)
        );
        assert!(matches!(
            parse_chat_id("X", "@channel"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_redis_url_without_password() {
        let config = RedisConfig {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
        };
        assert_eq!(config.url().expose_secret(), "redis://localhost:6379/");
    }

    #[test]
    fn test_redis_url_encodes_password() {
        let config = RedisConfig {
            host: "redis.internal".to_string(),
            port: 16_379,
            password: Some(SecretString::from("p@ss:w/rd")),
        };
        assert_eq!(
            config.url().expose_secret(),
            "redis://:p%40ss%3Aw%2Frd@redis.internal:16379/"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let moltin = MoltinConfig {
            api_url: DEFAULT_MOLTIN_API_URL.to_string(),
            client_id: "client_id_value".to_string(),
            client_secret: SecretString::from("super_secret_client_secret"),
        };
        let telegram = TelegramConfig {
            token: SecretString::from("super_secret_bot_token"),
            admin_chat_id: Some(ChatId::new(42)),
        };
        let redis = RedisConfig {
            host: "localhost".to_string(),
            port: 6379,
            password: Some(SecretString::from("super_secret_redis_password")),
        };

        let debug_output = format!("{moltin:?} {telegram:?} {redis:?}");

        assert!(debug_output.contains("client_id_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_client_secret"));
        assert!(!debug_output.contains("super_secret_bot_token"));
        assert!(!debug_output.contains("super_secret_redis_password"));
    }
}
