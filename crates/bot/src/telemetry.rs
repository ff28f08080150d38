//! Tracing, Sentry and admin chat alerts.
//!
//! Sentry has to be initialised before the subscriber so the Sentry layer
//! picks up the client; [`init`] does both in the right order and returns
//! the guard that must be kept alive for the lifetime of the process.

use std::fmt::Write as _;

use sentry::integrations::tracing as sentry_tracing;
use shopbot_core::{ChatId, OutboundAction};
use teloxide::Bot;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::BotConfig;
use crate::telegram::{ChatSender, TelegramSender};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "shopbot=info,teloxide=warn";

/// Events from this module are never forwarded, so a failing alert cannot
/// trigger another alert.
const WORKER_TARGET: &str = module_path!();

/// Longest alert sent to the admin chat, in characters.
const MAX_ALERT_CHARS: usize = 4000;

/// Initialize Sentry and the global tracing subscriber.
///
/// When an admin chat is configured, WARN and ERROR events are also sent
/// there by a background task. Must be called inside the Tokio runtime.
#[must_use]
pub fn init(config: &BotConfig, bot: &Bot) -> Option<sentry::ClientInitGuard> {
    let sentry_guard = init_sentry(config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let alerts = config.telegram.admin_chat_id.map(|chat_id| {
        let (layer, receiver) = AlertLayer::channel();
        tokio::spawn(run_alert_worker(
            TelegramSender::new(bot.clone()),
            chat_id,
            receiver,
        ));
        layer
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .with(alerts)
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    if let Some(chat_id) = config.telegram.admin_chat_id {
        tracing::info!(chat_id = %chat_id, "Forwarding warnings to admin chat");
    }

    sentry_guard
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &BotConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    Some(sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => sentry_tracing::EventFilter::Event,
        Level::INFO | Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

// =============================================================================
// Admin Alerts
// =============================================================================

/// Layer rendering WARN and ERROR events to one line each and handing them
/// to the alert worker.
#[derive(Debug, Clone)]
pub struct AlertLayer {
    sender: mpsc::UnboundedSender<String>,
}

impl AlertLayer {
    /// Create the layer and the receiving end for the worker.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl<S: Subscriber> Layer<S> for AlertLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !forwards(*metadata.level(), metadata.target()) {
            return;
        }

        let mut visitor = AlertVisitor::default();
        event.record(&mut visitor);

        // Receiver gone means the runtime is shutting down
        let _ = self
            .sender
            .send(visitor.render(*metadata.level(), metadata.target()));
    }
}

/// Whether an event at `level` from `target` goes to the admin chat.
fn forwards(level: Level, target: &str) -> bool {
    level <= Level::WARN && !target.starts_with("teloxide") && !target.starts_with(WORKER_TARGET)
}

/// Collects an event's message and fields.
#[derive(Debug, Default)]
struct AlertVisitor {
    message: String,
    fields: String,
}

impl Visit for AlertVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

impl AlertVisitor {
    fn render(&self, level: Level, target: &str) -> String {
        let line = format!("{level} {target}: {}{}", self.message, self.fields);
        if line.chars().count() > MAX_ALERT_CHARS {
            line.chars().take(MAX_ALERT_CHARS).collect()
        } else {
            line
        }
    }
}

/// Deliver queued alerts to the admin chat until the channel closes.
async fn run_alert_worker<S: ChatSender>(
    sender: S,
    chat_id: ChatId,
    mut receiver: mpsc::UnboundedReceiver<String>,
) {
    while let Some(text) = receiver.recv().await {
        let action = OutboundAction::SendText {
            chat_id,
            text,
            keyboard: None,
        };
        if let Err(e) = sender.perform(&action).await {
            tracing::debug!(error = %e, "Failed to deliver admin alert");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarding_rules() {
        assert!(forwards(Level::ERROR, "shopbot::error"));
        assert!(forwards(Level::WARN, "shopbot::dialogue::handlers"));
        assert!(!forwards(Level::INFO, "shopbot::error"));
        assert!(!forwards(Level::ERROR, "teloxide::dispatching"));
        assert!(!forwards(Level::ERROR, WORKER_TARGET));
    }

    #[test]
    fn test_warning_is_rendered_with_fields() {
        let (layer, mut receiver) = AlertLayer::channel();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "shopbot::test", chat_id = 42, "Cart is gone");
            tracing::info!(target: "shopbot::test", "Not forwarded");
        });

        assert_eq!(
            receiver.try_recv().unwrap(),
            "WARN shopbot::test: Cart is gone chat_id=42"
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_long_alerts_are_truncated() {
        let visitor = AlertVisitor {
            message: "x".repeat(MAX_ALERT_CHARS * 2),
            fields: String::new(),
        };
        assert_eq!(
            visitor.render(Level::ERROR, "shopbot").chars().count(),
            MAX_ALERT_CHARS
        );
    }
}
