//! One handler per session state.
//!
//! Every handler has the same shape: it takes the triggering event and the
//! commerce API, and returns a [`Reply`]. Handlers never talk to the chat
//! platform or the session store themselves.

mod cart;
mod description;
mod menu;
mod start;
mod waiting_email;

use shopbot_core::{ChatId, InboundEvent, OutboundAction, SessionState};

use super::Reply;
use super::keyboards::{cart_keyboard, menu_keyboard};
use super::messages::{MENU_PROMPT, cart_message};
use crate::error::{BotError, Result};
use crate::moltin::CommerceApi;

/// Run the handler bound to `state`.
///
/// # Errors
///
/// Returns the handler's error; see the individual handlers.
pub async fn dispatch<C: CommerceApi>(
    state: SessionState,
    event: &InboundEvent,
    commerce: &C,
) -> Result<Reply> {
    match state {
        SessionState::Start => start::handle(event, commerce).await,
        SessionState::HandleMenu => menu::handle(event, commerce).await,
        SessionState::HandleDescription => description::handle(event, commerce).await,
        SessionState::HandleCart => cart::handle(event, commerce).await,
        SessionState::HandleWaitingEmail => waiting_email::handle(event, commerce).await,
    }
}

/// A button press as seen by a handler.
struct Press<'a> {
    callback_id: &'a str,
    chat_id: ChatId,
    data: &'a str,
}

/// Require a button press; free text in a button-driven state is an error.
fn expect_callback(state: SessionState, event: &InboundEvent) -> Result<Press<'_>> {
    match event {
        InboundEvent::Callback {
            callback_id,
            chat_id,
            data,
            ..
        } => Ok(Press {
            callback_id,
            chat_id: *chat_id,
            data,
        }),
        InboundEvent::Message { .. } => Err(BotError::UnexpectedEvent {
            state,
            expected: "callback",
            received: event.kind(),
        }),
    }
}

/// Catalog menu message with `text` above it.
async fn menu_message<C: CommerceApi>(
    commerce: &C,
    chat_id: ChatId,
    text: String,
) -> Result<OutboundAction> {
    let catalog = commerce.list_products().await?;
    Ok(OutboundAction::SendText {
        chat_id,
        text,
        keyboard: Some(menu_keyboard(&catalog)),
    })
}

/// Fresh menu replacing the message the user pressed a button on.
async fn back_to_menu<C: CommerceApi>(commerce: &C, event: &InboundEvent) -> Result<Reply> {
    let chat_id = event.chat_id();
    let menu = menu_message(commerce, chat_id, MENU_PROMPT.to_string()).await?;
    Ok(Reply::new(
        SessionState::HandleMenu,
        vec![
            menu,
            OutboundAction::DeleteMessage {
                chat_id,
                message_id: event.message_id(),
            },
        ],
    ))
}

/// Current cart with its keyboard.
async fn cart_view<C: CommerceApi>(commerce: &C, chat_id: ChatId) -> Result<Reply> {
    let cart = commerce.get_cart(chat_id).await?;
    Ok(Reply::new(
        SessionState::HandleCart,
        vec![OutboundAction::SendText {
            chat_id,
            text: cart_message(&cart),
            keyboard: Some(cart_keyboard(&cart)),
        }],
    ))
}
