//! Test data builders for queue messages and answer events

use std::collections::HashMap;

use answers_core::{
    Answer, AnswerEvent, AnswerEventMessage, AnswerEventType, MessageAttributeValue,
    QueueMessage, ReceivedMessage, MESSAGE_TYPE_ATTRIBUTE,
};

/// 构造一条 Answer 事件消息
pub fn answer_event_message(event_type: AnswerEventType, key: &str, value: &str) -> QueueMessage {
    AnswerEventMessage::new(AnswerEvent::new(event_type, Answer::new(key, value))).into()
}

/// Answer 事件消息的 JSON 消息体
pub fn answer_event_body(event_type: AnswerEventType, key: &str, value: &str) -> String {
    serde_json::json!({
        "event": {
            "eventType": event_type.as_str(),
            "data": {"key": key, "value": value}
        }
    })
    .to_string()
}

/// Builder for creating test ReceivedMessage values
pub struct ReceivedMessageBuilder {
    message: ReceivedMessage,
}

impl ReceivedMessageBuilder {
    pub fn new() -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(
            MESSAGE_TYPE_ATTRIBUTE.to_string(),
            MessageAttributeValue::string("ANSWER_EVENT"),
        );

        let id = uuid::Uuid::new_v4().to_string();
        Self {
            message: ReceivedMessage {
                receipt_handle: format!("receipt-{id}"),
                message_id: id,
                body: answer_event_body(AnswerEventType::Create, "key", "value"),
                attributes,
            },
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.message.message_id = id.to_string();
        self.message.receipt_handle = format!("receipt-{id}");
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.message.body = body.to_string();
        self
    }

    pub fn with_answer_event(self, event_type: AnswerEventType, key: &str, value: &str) -> Self {
        self.with_body(&answer_event_body(event_type, key, value))
    }

    pub fn with_message_type(mut self, message_type: &str) -> Self {
        self.message.attributes.insert(
            MESSAGE_TYPE_ATTRIBUTE.to_string(),
            MessageAttributeValue::string(message_type),
        );
        self
    }

    pub fn without_attributes(mut self) -> Self {
        self.message.attributes.clear();
        self
    }

    pub fn build(self) -> ReceivedMessage {
        self.message
    }
}

impl Default for ReceivedMessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
