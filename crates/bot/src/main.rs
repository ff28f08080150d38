//! Shopbot - Telegram storefront for a Moltin shop.
//!
//! # Architecture
//!
//! - teloxide long polling feeding a per-chat finite-state machine
//! - Moltin REST API for the catalog, carts and customers
//! - Redis for the per-chat dialogue state (in-memory when not configured)
//! - Sentry and an optional admin chat for warnings and errors

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::ExposeSecret;
use shopbot::config::BotConfig;
use shopbot::dialogue::DialogueEngine;
use shopbot::moltin::MoltinClient;
use shopbot::session::{InMemorySessionStore, RedisSessionStore};
use shopbot::telegram::{TelegramSender, run_polling};
use shopbot::telemetry;
use teloxide::Bot;

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = BotConfig::from_env().expect("Failed to load configuration");

    let bot = Bot::new(config.telegram.token.expose_secret());
    let _sentry_guard = telemetry::init(&config, &bot);

    let commerce = MoltinClient::new(&config.moltin);
    let sender = TelegramSender::new(bot.clone());

    if let Some(redis) = &config.redis {
        let sessions = RedisSessionStore::connect(redis)
            .await
            .expect("Failed to connect to Redis");
        tracing::info!(host = %redis.host, port = redis.port, "Using Redis session store");
        run_polling(bot, Arc::new(DialogueEngine::new(commerce, sender, sessions))).await;
    } else {
        tracing::warn!("DATABASE_HOST not set, sessions are kept in memory and lost on restart");
        let sessions = InMemorySessionStore::new();
        run_polling(bot, Arc::new(DialogueEngine::new(commerce, sender, sessions))).await;
    }

    tracing::info!("Shutting down");
}
