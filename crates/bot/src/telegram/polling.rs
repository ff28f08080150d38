//! Long-polling loop feeding updates into the dialogue engine.

use std::sync::Arc;

use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::{Bot, ResponseResult};
use teloxide::types::{CallbackQuery, Message, Update};
use tracing::{debug, info};

use super::TelegramSender;
use super::updates::{inbound_from_callback, inbound_from_message};
use crate::dialogue::DialogueEngine;
use crate::moltin::CommerceApi;
use crate::session::SessionStore;

type Engine<C, St> = Arc<DialogueEngine<C, TelegramSender, St>>;

/// Poll Telegram for updates until Ctrl+C.
///
/// Updates from different chats are handled concurrently; each one runs
/// through [`DialogueEngine::handle`], which never fails, so the loop keeps
/// going regardless of per-turn errors.
pub async fn run_polling<C, St>(bot: Bot, engine: Engine<C, St>)
where
    C: CommerceApi + 'static,
    St: SessionStore + 'static,
{
    let handler = teloxide::dptree::entry()
        .branch(Update::filter_message().endpoint(on_message::<C, St>))
        .branch(Update::filter_callback_query().endpoint(on_callback::<C, St>));

    info!("Polling Telegram for updates");

    Dispatcher::builder(bot, handler)
        .dependencies(teloxide::dptree::deps![engine])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Ignoring unsupported update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update listener",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_message<C, St>(msg: Message, engine: Engine<C, St>) -> ResponseResult<()>
where
    C: CommerceApi + 'static,
    St: SessionStore + 'static,
{
    match inbound_from_message(&msg) {
        Some(event) => engine.handle(event).await,
        None => debug!(chat_id = msg.chat.id.0, "Ignoring message without text"),
    }
    Ok(())
}

async fn on_callback<C, St>(query: CallbackQuery, engine: Engine<C, St>) -> ResponseResult<()>
where
    C: CommerceApi + 'static,
    St: SessionStore + 'static,
{
    match inbound_from_callback(&query) {
        Some(event) => engine.handle(event).await,
        None => debug!(callback_id = %query.id, "Ignoring callback without data or message"),
    }
    Ok(())
}
