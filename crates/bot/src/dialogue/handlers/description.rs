//! `HANDLE_DESCRIPTION`: a button on a product card was pressed.

use shopbot_core::{DescriptionCommand, InboundEvent, OutboundAction, SessionState};
use tracing::{debug, warn};

use super::{Reply, back_to_menu, cart_view, expect_callback};
use crate::dialogue::messages::ADDED_TO_CART;
use crate::error::{BotError, Result};
use crate::moltin::CommerceApi;

pub(super) async fn handle<C: CommerceApi>(event: &InboundEvent, commerce: &C) -> Result<Reply> {
    let press = expect_callback(SessionState::HandleDescription, event)?;

    match DescriptionCommand::parse(press.data) {
        DescriptionCommand::Back => back_to_menu(commerce, event).await,
        DescriptionCommand::Cart => cart_view(commerce, press.chat_id).await,
        DescriptionCommand::Add {
            quantity,
            product_id: Some(product_id),
        } => {
            commerce
                .add_to_cart(press.chat_id, &product_id, quantity)
                .await?;
            debug!(product_id = %product_id, quantity, "Product added to cart");
            Ok(Reply::new(
                SessionState::HandleDescription,
                vec![OutboundAction::AnswerCallback {
                    callback_id: press.callback_id.to_owned(),
                    text: ADDED_TO_CART.to_string(),
                }],
            ))
        }
        DescriptionCommand::Add {
            product_id: None, ..
        } => Err(BotError::MalformedCallback(press.data.to_owned())),
        DescriptionCommand::Unknown(command) => {
            warn!(command = %command, "Unknown product card command, returning to menu");
            Ok(Reply::silent(SessionState::HandleMenu))
        }
    }
}
