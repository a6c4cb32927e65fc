use std::sync::Arc;

use answers_core::{AnswerError, AnswerEventMessage, AnswerEventRepository, AnswerResult};
use tracing::debug;

/// 校验 Answer 事件消息并写入事件历史
pub struct AnswerEventHandler {
    event_repository: Arc<dyn AnswerEventRepository>,
}

impl AnswerEventHandler {
    pub fn new(event_repository: Arc<dyn AnswerEventRepository>) -> Self {
        Self { event_repository }
    }

    /// 校验失败返回 `InvalidArgument`；存储错误原样返回
    pub async fn handle(&self, message: Option<&AnswerEventMessage>) -> AnswerResult<()> {
        let message =
            message.ok_or_else(|| AnswerError::invalid_argument("AnswerEventMessage required"))?;
        let event = message.validated_event()?;

        self.event_repository.create(event).await?;
        debug!(
            key = event.key().unwrap_or_default(),
            event_type = %event.event_type,
            "事件已写入历史"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answers_core::{Answer, AnswerEvent, AnswerEventType, ErrorKind};
    use answers_testing_utils::RecordingEventRepository;

    fn handler() -> (AnswerEventHandler, RecordingEventRepository) {
        let repository = RecordingEventRepository::new();
        (AnswerEventHandler::new(Arc::new(repository.clone())), repository)
    }

    async fn rejection(message: Option<&AnswerEventMessage>) -> String {
        let (handler, repository) = handler();
        let err = handler.handle(message).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(repository.create_calls(), 0);
        err.message()
    }

    #[tokio::test]
    async fn test_valid_event_is_appended() {
        let (handler, repository) = handler();
        let event = AnswerEvent::new(AnswerEventType::Create, Answer::new("a", "1"));

        handler
            .handle(Some(&AnswerEventMessage::new(event.clone())))
            .await
            .unwrap();

        assert_eq!(repository.created_events(), vec![event]);
    }

    #[tokio::test]
    async fn test_validation_order() {
        assert_eq!(rejection(None).await, "AnswerEventMessage required");
        assert_eq!(
            rejection(Some(&AnswerEventMessage { event: None })).await,
            "Event required"
        );

        let unknown_type = AnswerEventMessage::new(AnswerEvent {
            event_type: AnswerEventType::Unknown,
            data: None,
        });
        assert_eq!(rejection(Some(&unknown_type)).await, "EventType is not valid");

        let no_data = AnswerEventMessage::new(AnswerEvent {
            event_type: AnswerEventType::Delete,
            data: None,
        });
        assert_eq!(rejection(Some(&no_data)).await, "EventData required");

        let empty_value = AnswerEventMessage::new(AnswerEvent::new(
            AnswerEventType::Update,
            Answer::new("a", ""),
        ));
        assert_eq!(rejection(Some(&empty_value)).await, "Value required");
    }

    #[tokio::test]
    async fn test_store_error_is_returned_unchanged() {
        let (handler, repository) = handler();
        repository.fail_with("table unavailable");

        let err = handler
            .handle(Some(&AnswerEventMessage::new(AnswerEvent::new(
                AnswerEventType::Create,
                Answer::new("a", "1"),
            ))))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_poison());
    }
}
