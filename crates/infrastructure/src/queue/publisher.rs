use std::collections::HashMap;
use std::sync::Arc;

use answers_core::{
    AnswerError, AnswerResult, MessageAttributeValue, QueueApi, QueueAttributes, QueueMessage,
    QueueService, SendMessageRequest, MESSAGE_TYPE_ATTRIBUTE,
};
use async_trait::async_trait;
use tracing::debug;

use super::resolver::QueueUrlResolver;

/// 队列发布者：校验、编码并附带消息类型属性发送消息
pub struct QueuePublisher {
    api: Arc<dyn QueueApi>,
    resolver: QueueUrlResolver,
}

impl QueuePublisher {
    pub fn new(api: Arc<dyn QueueApi>, attributes: QueueAttributes) -> Self {
        Self {
            resolver: QueueUrlResolver::new(api.clone(), attributes),
            api,
        }
    }
}

#[async_trait]
impl QueueService for QueuePublisher {
    async fn send_message(&self, queue_name: &str, message: &QueueMessage) -> AnswerResult<String> {
        if queue_name.is_empty() {
            return Err(AnswerError::invalid_argument("Queue name required"));
        }

        message.validate()?;

        let body = message.encode_body()?;
        let queue_url = self.resolver.resolve(queue_name).await?;

        let mut attributes = HashMap::new();
        attributes.insert(
            MESSAGE_TYPE_ATTRIBUTE.to_string(),
            MessageAttributeValue::string(message.message_type().as_str()),
        );

        let message_id = self
            .api
            .send_message(SendMessageRequest {
                queue_url,
                body,
                attributes,
            })
            .await?;

        debug!("消息已发送到队列 {}: {}", queue_name, message_id);
        Ok(message_id)
    }
}
