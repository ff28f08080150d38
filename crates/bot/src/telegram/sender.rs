//! `TelegramSender`: teloxide-backed [`ChatSender`].

use shopbot_core::{InlineKeyboard, OutboundAction};
use teloxide::Bot;
use teloxide::payloads::{AnswerCallbackQuerySetters, SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId};
use tracing::{debug, instrument};
use url::Url;

use super::{ChatSender, TelegramError};

/// Sends messages through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl std::fmt::Debug for TelegramSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSender")
            .field("bot", &"[REDACTED]")
            .finish()
    }
}

impl TelegramSender {
    /// Wrap a bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl ChatSender for TelegramSender {
    #[instrument(skip_all)]
    async fn perform(&self, action: &OutboundAction) -> Result<(), TelegramError> {
        match action {
            OutboundAction::SendText {
                chat_id,
                text,
                keyboard,
            } => {
                let request = self.bot.send_message(ChatId(chat_id.get()), text);
                let message = match keyboard {
                    Some(keyboard) => request.reply_markup(markup(keyboard)).await?,
                    None => request.await?,
                };
                debug!(chat_id = %chat_id, message_id = message.id.0, "Sent text");
            }
            OutboundAction::SendPhoto {
                chat_id,
                photo_url,
                caption,
                keyboard,
            } => {
                let url = Url::parse(photo_url).map_err(|source| TelegramError::InvalidUrl {
                    url: photo_url.clone(),
                    source,
                })?;
                let message = self
                    .bot
                    .send_photo(ChatId(chat_id.get()), InputFile::url(url))
                    .caption(caption)
                    .reply_markup(markup(keyboard))
                    .await?;
                debug!(chat_id = %chat_id, message_id = message.id.0, "Sent photo");
            }
            OutboundAction::DeleteMessage {
                chat_id,
                message_id,
            } => {
                self.bot
                    .delete_message(ChatId(chat_id.get()), MessageId(message_id.get()))
                    .await?;
                debug!(chat_id = %chat_id, message_id = %message_id, "Deleted message");
            }
            OutboundAction::AnswerCallback { callback_id, text } => {
                self.bot
                    .answer_callback_query(callback_id.clone())
                    .text(text)
                    .await?;
            }
        }
        Ok(())
    }
}

/// Build a teloxide inline keyboard.
fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(&button.label, &button.data))
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopbot_core::InlineButton;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_markup_keeps_layout_and_data() {
        let keyboard = InlineKeyboard::new()
            .row(vec![
                InlineButton::new("1 pc.", "1,p"),
                InlineButton::new("3 pcs.", "3,p"),
            ])
            .row(vec![InlineButton::new("Back", "back")]);

        let markup = markup(&keyboard);

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        let button = &markup.inline_keyboard[1][0];
        assert_eq!(button.text, "Back");
        assert!(matches!(
            &button.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "back"
        ));
    }
}
