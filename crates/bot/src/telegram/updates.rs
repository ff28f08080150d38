//! Conversion of teloxide updates into dialogue events.
//!
//! Updates that carry neither text nor callback data (stickers, photos,
//! inline-mode button presses without a message) have no meaning for the
//! dialogue and convert to `None`.

use shopbot_core::{ChatId, InboundEvent, MessageId, Sender, UserId};
use teloxide::types::{CallbackQuery, Message, User};

fn sender(user: &User) -> Sender {
    Sender {
        id: UserId::new(user.id.0),
        first_name: user.first_name.clone(),
    }
}

/// Convert a text message.
#[must_use]
pub fn inbound_from_message(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    let user = msg.from.as_ref()?;

    Some(InboundEvent::Message {
        chat_id: ChatId::new(msg.chat.id.0),
        message_id: MessageId::new(msg.id.0),
        sender: sender(user),
        text: text.to_owned(),
    })
}

/// Convert a button press.
#[must_use]
pub fn inbound_from_callback(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.as_ref()?;
    let message = query.message.as_ref()?;

    Some(InboundEvent::Callback {
        callback_id: query.id.clone(),
        chat_id: ChatId::new(message.chat().id.0),
        message_id: MessageId::new(message.id().0),
        sender: sender(&query.from),
        data: data.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn message_json(extra: Value) -> Value {
        let mut message = json!({
            "message_id": 31,
            "date": 1_700_000_000,
            "chat": {"id": 5005, "type": "private", "first_name": "Ann"},
            "from": {"id": 777, "is_bot": false, "first_name": "Ann"}
        });
        if let (Some(message), Some(extra)) = (message.as_object_mut(), extra.as_object()) {
            message.extend(extra.clone());
        }
        message
    }

    fn message(extra: Value) -> Message {
        serde_json::from_value(message_json(extra)).unwrap()
    }

    fn callback(data: Option<&str>) -> CallbackQuery {
        let mut query = json!({
            "id": "cb-1",
            "from": {"id": 777, "is_bot": false, "first_name": "Ann"},
            "chat_instance": "instance-1",
            "message": message_json(json!({"text": "Please choose:"}))
        });
        if let Some(data) = data {
            query["data"] = json!(data);
        }
        serde_json::from_value(query).unwrap()
    }

    #[test]
    fn test_text_message_converts() {
        let event = inbound_from_message(&message(json!({"text": "/start"}))).unwrap();

        assert_eq!(event.user_reply(), "/start");
        assert_eq!(event.chat_id(), ChatId::new(5005));
        assert_eq!(event.message_id(), MessageId::new(31));
        assert_eq!(event.sender().first_name, "Ann");
    }

    #[test]
    fn test_message_without_text_is_dropped() {
        let location = message(json!({"location": {"latitude": 59.93, "longitude": 30.31}}));
        assert!(inbound_from_message(&location).is_none());
    }

    #[test]
    fn test_callback_converts() {
        let event = inbound_from_callback(&callback(Some("3,salmon"))).unwrap();

        assert_eq!(event.kind(), "callback");
        assert_eq!(event.user_reply(), "3,salmon");
        assert_eq!(event.chat_id(), ChatId::new(5005));
        assert_eq!(event.message_id(), MessageId::new(31));
    }

    #[test]
    fn test_callback_without_data_is_dropped() {
        assert!(inbound_from_callback(&callback(None)).is_none());
    }
}
