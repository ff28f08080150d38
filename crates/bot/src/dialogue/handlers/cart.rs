//! `HANDLE_CART`: a button under the cart was pressed.

use shopbot_core::{CartSelection, InboundEvent, OutboundAction, SessionState};
use tracing::debug;

use super::{Reply, back_to_menu, cart_view, expect_callback};
use crate::dialogue::messages::EMAIL_PROMPT;
use crate::error::Result;
use crate::moltin::CommerceApi;

pub(super) async fn handle<C: CommerceApi>(event: &InboundEvent, commerce: &C) -> Result<Reply> {
    let press = expect_callback(SessionState::HandleCart, event)?;

    match CartSelection::parse(press.data) {
        CartSelection::Menu => back_to_menu(commerce, event).await,
        CartSelection::Checkout => Ok(Reply::new(
            SessionState::HandleWaitingEmail,
            vec![OutboundAction::SendText {
                chat_id: press.chat_id,
                text: EMAIL_PROMPT.to_string(),
                keyboard: None,
            }],
        )),
        CartSelection::Remove(item_id) => {
            commerce.remove_from_cart(press.chat_id, &item_id).await?;
            debug!(item_id = %item_id, "Removed cart line");
            cart_view(commerce, press.chat_id).await
        }
    }
}
