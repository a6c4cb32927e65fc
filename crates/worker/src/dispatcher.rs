use std::str::FromStr;

use answers_core::{
    decode_payload, AnswerError, AnswerEventMessage, AnswerResult, MessageType, ReceivedMessage,
    MESSAGE_TYPE_ATTRIBUTE,
};
use async_trait::async_trait;
use tracing::debug;

use crate::answer_event::AnswerEventHandler;
use crate::handler::QueueHandler;

/// 按 `MessageType` 属性把消息路由到对应的类型化处理器
pub struct MessageDispatcher {
    answer_event_handler: AnswerEventHandler,
}

impl MessageDispatcher {
    pub fn new(answer_event_handler: AnswerEventHandler) -> Self {
        Self {
            answer_event_handler,
        }
    }
}

#[async_trait]
impl QueueHandler for MessageDispatcher {
    async fn handle(&self, message: &ReceivedMessage) -> AnswerResult<()> {
        let message_type = message
            .string_attribute(MESSAGE_TYPE_ATTRIBUTE)
            .ok_or_else(|| AnswerError::not_found("Message type not found in attributes"))?;
        let message_type = MessageType::from_str(message_type)?;

        debug!(message_id = %message.message_id, %message_type, "分发消息");

        match message_type {
            MessageType::AnswerEvent => {
                let payload: Option<AnswerEventMessage> = decode_payload(&message.body)?;
                self.answer_event_handler.handle(payload.as_ref()).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use answers_core::{AnswerEventType, ErrorKind};
    use answers_testing_utils::{RecordingEventRepository, ReceivedMessageBuilder};

    fn dispatcher() -> (MessageDispatcher, RecordingEventRepository) {
        let repository = RecordingEventRepository::new();
        let handler = AnswerEventHandler::new(Arc::new(repository.clone()));
        (MessageDispatcher::new(handler), repository)
    }

    #[tokio::test]
    async fn test_routes_answer_event() {
        let (dispatcher, repository) = dispatcher();
        let message = ReceivedMessageBuilder::new()
            .with_answer_event(AnswerEventType::Update, "a", "2")
            .build();

        dispatcher.handle(&message).await.unwrap();

        let events = repository.created_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AnswerEventType::Update);
        assert_eq!(events[0].key(), Some("a"));
    }

    #[tokio::test]
    async fn test_missing_type_attribute_is_not_found() {
        let (dispatcher, repository) = dispatcher();
        let message = ReceivedMessageBuilder::new().without_attributes().build();

        let err = dispatcher.handle(&message).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Message type not found in attributes");
        assert_eq!(repository.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_not_found() {
        let (dispatcher, _) = dispatcher();
        let message = ReceivedMessageBuilder::new()
            .with_message_type("ORDER_EVENT")
            .build();

        let err = dispatcher.handle(&message).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!err.is_poison());
    }

    #[tokio::test]
    async fn test_null_and_malformed_bodies_are_poison() {
        let (dispatcher, _) = dispatcher();

        let err = dispatcher
            .handle(&ReceivedMessageBuilder::new().with_body("null").build())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "AnswerEventMessage required");

        let err = dispatcher
            .handle(&ReceivedMessageBuilder::new().with_body("{not json").build())
            .await
            .unwrap_err();
        assert!(err.is_poison());
    }
}
