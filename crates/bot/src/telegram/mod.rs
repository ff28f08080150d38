//! Telegram integration.
//!
//! This module provides:
//! - [`ChatSender`], the seam through which handlers' [`OutboundAction`]s
//!   reach the chat platform
//! - [`TelegramSender`], its teloxide implementation
//! - conversion of teloxide updates into [`shopbot_core::InboundEvent`]s
//! - the long-polling loop feeding the dialogue engine

mod polling;
mod sender;
mod updates;

pub use polling::run_polling;
pub use sender::TelegramSender;
pub use updates::{inbound_from_callback, inbound_from_message};

use std::future::Future;

use shopbot_core::OutboundAction;
use thiserror::Error;

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot API request failed.
    #[error("Telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),

    /// A photo URL from the commerce API could not be parsed.
    #[error("Invalid photo URL {url}: {source}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },
}

/// Performs outbound actions on the chat platform.
///
/// Uses native async fn in traits (Rust 2024 edition, no `async_trait` macro).
pub trait ChatSender: Send + Sync {
    /// Carry out one action.
    fn perform(
        &self,
        action: &OutboundAction,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;
}
