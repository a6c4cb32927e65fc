//! # Answer 领域服务
//!
//! 写操作先修改 Answer 主表，再向事件队列发布对应的 Answer 事件。
//! 事件历史由 Worker 异步写入，因此写操作返回时历史记录可能尚未出现。

use std::sync::Arc;

use answers_core::{
    Answer, AnswerError, AnswerEvent, AnswerEventMessage, AnswerEventRepository, AnswerEventType,
    AnswerRepository, AnswerResult, AnswerService, QueueService,
};
use async_trait::async_trait;
use tracing::debug;

pub struct AnswerServiceImpl {
    repository: Arc<dyn AnswerRepository>,
    event_repository: Arc<dyn AnswerEventRepository>,
    queue_service: Arc<dyn QueueService>,
    event_queue_name: String,
}

impl AnswerServiceImpl {
    pub fn new(
        repository: Arc<dyn AnswerRepository>,
        event_repository: Arc<dyn AnswerEventRepository>,
        queue_service: Arc<dyn QueueService>,
        event_queue_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            event_repository,
            queue_service,
            event_queue_name: event_queue_name.into(),
        }
    }

    async fn publish_event(&self, event_type: AnswerEventType, answer: Answer) -> AnswerResult<()> {
        let message = AnswerEventMessage::new(AnswerEvent::new(event_type, answer)).into();
        let message_id = self
            .queue_service
            .send_message(&self.event_queue_name, &message)
            .await?;

        debug!(
            "已发布 {} 事件到队列 {}: {}",
            event_type, self.event_queue_name, message_id
        );
        Ok(())
    }
}

#[async_trait]
impl AnswerService for AnswerServiceImpl {
    async fn create_answer(&self, answer: &Answer) -> AnswerResult<()> {
        answer.validate()?;

        if self.repository.get(&answer.key).await?.is_some() {
            return Err(AnswerError::already_exists(
                "Answer with the provided key is already in use",
            ));
        }

        self.repository.create(answer).await?;
        self.publish_event(AnswerEventType::Create, answer.clone())
            .await
    }

    async fn update_answer(&self, answer: &Answer) -> AnswerResult<()> {
        answer.validate()?;

        if self.repository.get(&answer.key).await?.is_none() {
            return Err(AnswerError::not_found(
                "Answer with the provided key not found",
            ));
        }

        self.repository.update(answer).await?;
        self.publish_event(AnswerEventType::Update, answer.clone())
            .await
    }

    async fn delete_answer(&self, key: &str) -> AnswerResult<()> {
        if key.is_empty() {
            return Err(AnswerError::invalid_argument("AnswerKey required"));
        }

        let existing = self.repository.get(key).await?.ok_or_else(|| {
            AnswerError::not_found("Answer with the provided key not found")
        })?;

        self.repository.delete(key).await?;
        // delete 事件携带删除前的数据，事件结构校验要求 data 完整
        self.publish_event(AnswerEventType::Delete, existing).await
    }

    async fn get_answer(&self, key: &str) -> AnswerResult<Answer> {
        if key.is_empty() {
            return Err(AnswerError::invalid_argument("AnswerKey required"));
        }

        self.repository
            .get(key)
            .await?
            .ok_or_else(|| AnswerError::not_found("Answer not found"))
    }

    async fn get_answer_history(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>> {
        if key.is_empty() {
            return Err(AnswerError::invalid_argument("AnswerKey required"));
        }

        self.event_repository.list_events(key).await
    }
}
