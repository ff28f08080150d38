//! `HANDLE_WAITING_EMAIL`: the customer typed their email address.

use shopbot_core::{Email, InboundEvent, OutboundAction, SessionState, Sender};
use tracing::{debug, info};

use super::{Reply, menu_message};
use crate::dialogue::messages::{email_received, email_rejected};
use crate::error::{BotError, Result};
use crate::moltin::CommerceApi;

/// Customer name recorded in the shop, unique per Telegram user.
pub(super) fn customer_name(sender: &Sender) -> String {
    format!("{}_tgid-{}", sender.first_name, sender.id)
}

pub(super) async fn handle<C: CommerceApi>(event: &InboundEvent, commerce: &C) -> Result<Reply> {
    let InboundEvent::Message {
        chat_id,
        sender,
        text,
        ..
    } = event
    else {
        return Err(BotError::UnexpectedEvent {
            state: SessionState::HandleWaitingEmail,
            expected: "message",
            received: event.kind(),
        });
    };

    let email = match Email::parse(text) {
        Ok(email) => email,
        Err(err) => {
            debug!(error = %err, "Rejected email address");
            return Ok(Reply::new(
                SessionState::HandleWaitingEmail,
                vec![OutboundAction::SendText {
                    chat_id: *chat_id,
                    text: email_rejected(text),
                    keyboard: None,
                }],
            ));
        }
    };

    let customer_id = commerce
        .create_customer(&customer_name(sender), &email)
        .await?;
    info!(customer_id = %customer_id, "Customer created at checkout");

    let confirmation = menu_message(commerce, *chat_id, email_received(&email)).await?;
    Ok(Reply::new(SessionState::HandleMenu, vec![confirmation]))
}
