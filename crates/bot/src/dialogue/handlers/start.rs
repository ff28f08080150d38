//! `START`: show the catalog menu.

use shopbot_core::{InboundEvent, SessionState};

use super::{Reply, menu_message};
use crate::dialogue::messages::MENU_PROMPT;
use crate::error::Result;
use crate::moltin::CommerceApi;

pub(super) async fn handle<C: CommerceApi>(event: &InboundEvent, commerce: &C) -> Result<Reply> {
    let menu = menu_message(commerce, event.chat_id(), MENU_PROMPT.to_string()).await?;
    Ok(Reply::new(SessionState::HandleMenu, vec![menu]))
}
