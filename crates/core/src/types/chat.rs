//! Chat events flowing into the dialogue and actions flowing out of it.

use serde::{Deserialize, Serialize};

use super::id::{ChatId, MessageId, UserId};

/// The person who produced an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Telegram user ID.
    pub id: UserId,
    /// First name as set in the user's profile.
    pub first_name: String,
}

/// An update from the chat platform that the dialogue reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A free-text message.
    Message {
        /// Chat the message was posted in.
        chat_id: ChatId,
        /// The message itself.
        message_id: MessageId,
        /// Author.
        sender: Sender,
        /// Message text.
        text: String,
    },
    /// A press on an inline keyboard button.
    Callback {
        /// Callback query ID, needed to answer with a toast.
        callback_id: String,
        /// Chat of the message carrying the keyboard.
        chat_id: ChatId,
        /// Message carrying the keyboard.
        message_id: MessageId,
        /// Who pressed the button.
        sender: Sender,
        /// Opaque data attached to the button.
        data: String,
    },
}

impl InboundEvent {
    /// The text or callback data the user sent.
    #[must_use]
    pub fn user_reply(&self) -> &str {
        match self {
            Self::Message { text, .. } => text,
            Self::Callback { data, .. } => data,
        }
    }

    /// The chat the event belongs to.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        match self {
            Self::Message { chat_id, .. } | Self::Callback { chat_id, .. } => *chat_id,
        }
    }

    /// The message that triggered the event.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        match self {
            Self::Message { message_id, .. } | Self::Callback { message_id, .. } => *message_id,
        }
    }

    /// Who produced the event.
    #[must_use]
    pub const fn sender(&self) -> &Sender {
        match self {
            Self::Message { sender, .. } | Self::Callback { sender, .. } => sender,
        }
    }

    /// Short name of the event kind, for logs and errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Callback { .. } => "callback",
        }
    }
}

/// A labelled button carrying callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    /// Text shown on the button.
    pub label: String,
    /// Data sent back when the button is pressed.
    pub data: String,
}

impl InlineButton {
    /// Create a button.
    #[must_use]
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// An inline keyboard laid out as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    /// Button rows, top to bottom.
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Create an empty keyboard.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row of buttons.
    #[must_use]
    pub fn row(mut self, buttons: Vec<InlineButton>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Iterate over every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }

    /// Find the button carrying the given callback data.
    #[must_use]
    pub fn button_with_data(&self, data: &str) -> Option<&InlineButton> {
        self.buttons().find(|b| b.data == data)
    }
}

/// A side effect on the chat platform requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundAction {
    /// Send a text message, optionally with a keyboard.
    SendText {
        /// Target chat.
        chat_id: ChatId,
        /// Message text.
        text: String,
        /// Inline keyboard under the message.
        keyboard: Option<InlineKeyboard>,
    },
    /// Send a photo with a caption and keyboard.
    SendPhoto {
        /// Target chat.
        chat_id: ChatId,
        /// Public URL of the photo.
        photo_url: String,
        /// Caption under the photo.
        caption: String,
        /// Inline keyboard under the photo.
        keyboard: InlineKeyboard,
    },
    /// Delete a previously sent message.
    DeleteMessage {
        /// Chat holding the message.
        chat_id: ChatId,
        /// Message to delete.
        message_id: MessageId,
    },
    /// Answer a button press with a transient toast.
    AnswerCallback {
        /// Callback query being answered.
        callback_id: String,
        /// Toast text.
        text: String,
    },
}
