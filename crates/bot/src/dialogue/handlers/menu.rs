//! `HANDLE_MENU`: a product or the cart was picked from the menu.

use shopbot_core::{InboundEvent, MenuSelection, OutboundAction, SessionState};
use tracing::debug;

use super::{Reply, cart_view, expect_callback};
use crate::dialogue::keyboards::description_keyboard;
use crate::dialogue::messages::product_description;
use crate::error::Result;
use crate::moltin::CommerceApi;

pub(super) async fn handle<C: CommerceApi>(event: &InboundEvent, commerce: &C) -> Result<Reply> {
    let press = expect_callback(SessionState::HandleMenu, event)?;

    let product_id = match MenuSelection::parse(press.data) {
        MenuSelection::Cart => return cart_view(commerce, press.chat_id).await,
        MenuSelection::Product(product_id) => product_id,
    };

    let product = commerce.get_product(&product_id).await?;
    let photo_url = commerce.get_product_image_url(&product.id).await?;
    debug!(product_id = %product.id, "Showing product card");

    Ok(Reply::new(
        SessionState::HandleDescription,
        vec![
            OutboundAction::SendPhoto {
                chat_id: press.chat_id,
                photo_url,
                caption: product_description(&product),
                keyboard: description_keyboard(&product.id),
            },
            OutboundAction::DeleteMessage {
                chat_id: press.chat_id,
                message_id: event.message_id(),
            },
        ],
    ))
}
