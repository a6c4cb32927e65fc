use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{AnswerError, AnswerResult};
use crate::models::answer::AnswerEvent;

/// 携带消息类型的消息属性名
pub const MESSAGE_TYPE_ATTRIBUTE: &str = "MessageType";

/// 队列消息类型（消息属性中的判别值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    AnswerEvent,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::AnswerEvent => "ANSWER_EVENT",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = AnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ANSWER_EVENT" => Ok(MessageType::AnswerEvent),
            other => Err(AnswerError::not_found(format!(
                "Unsupported message type {other}"
            ))),
        }
    }
}

/// Answer 变更事件消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEventMessage {
    pub event: Option<AnswerEvent>,
}

impl AnswerEventMessage {
    pub fn new(event: AnswerEvent) -> Self {
        Self { event: Some(event) }
    }

    pub fn validate(&self) -> AnswerResult<()> {
        self.validated_event().map(|_| ())
    }

    /// 校验通过后返回其中的事件
    pub fn validated_event(&self) -> AnswerResult<&AnswerEvent> {
        let event = self
            .event
            .as_ref()
            .ok_or_else(|| AnswerError::invalid_argument("Event required"))?;
        event.validate()?;
        Ok(event)
    }
}

/// 队列消息：按类型区分的消息体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueMessage {
    AnswerEvent(AnswerEventMessage),
}

impl QueueMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            QueueMessage::AnswerEvent(_) => MessageType::AnswerEvent,
        }
    }

    pub fn validate(&self) -> AnswerResult<()> {
        match self {
            QueueMessage::AnswerEvent(message) => message.validate(),
        }
    }

    /// 将消息体编码为 JSON 字符串
    pub fn encode_body(&self) -> AnswerResult<String> {
        let body = match self {
            QueueMessage::AnswerEvent(message) => serde_json::to_string(message)?,
        };
        Ok(body)
    }
}

impl From<AnswerEventMessage> for QueueMessage {
    fn from(message: AnswerEventMessage) -> Self {
        QueueMessage::AnswerEvent(message)
    }
}

/// 解码消息体；无法解析的消息体属于毒消息，返回 `InvalidArgument`
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> AnswerResult<T> {
    serde_json::from_str(body)
        .map_err(|e| AnswerError::invalid_argument(format!("Malformed message body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::{Answer, AnswerEventType};

    #[test]
    fn test_message_type_parse() {
        assert_eq!(
            "ANSWER_EVENT".parse::<MessageType>().unwrap(),
            MessageType::AnswerEvent
        );

        let err = "ORDER_EVENT".parse::<MessageType>().unwrap_err();
        assert_eq!(err.message(), "Unsupported message type ORDER_EVENT");
        assert!(!err.is_poison());
    }

    #[test]
    fn test_encode_then_decode_answer_event() {
        let message = QueueMessage::from(AnswerEventMessage::new(AnswerEvent::new(
            AnswerEventType::Create,
            Answer::new("a", "1"),
        )));
        assert_eq!(message.message_type(), MessageType::AnswerEvent);

        let body = message.encode_body().unwrap();
        assert_eq!(
            body,
            r#"{"event":{"eventType":"create","data":{"key":"a","value":"1"}}}"#
        );

        let decoded: AnswerEventMessage = decode_payload(&body).unwrap();
        assert_eq!(QueueMessage::AnswerEvent(decoded), message);
    }

    #[test]
    fn test_decode_optional_parts() {
        let decoded: Option<AnswerEventMessage> = decode_payload("null").unwrap();
        assert!(decoded.is_none());

        let decoded: AnswerEventMessage = decode_payload("{}").unwrap();
        assert_eq!(decoded.validate().unwrap_err().message(), "Event required");

        let err = decode_payload::<AnswerEventMessage>("not json").unwrap_err();
        assert!(err.is_poison());
    }

    #[test]
    fn test_validate_rejects_invalid_payload() {
        let message = QueueMessage::AnswerEvent(AnswerEventMessage {
            event: Some(AnswerEvent {
                event_type: AnswerEventType::Update,
                data: Some(Answer::new("", "1")),
            }),
        });
        assert_eq!(message.validate().unwrap_err().message(), "Key required");
    }
}
