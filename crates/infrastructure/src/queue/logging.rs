use std::sync::Arc;
use std::time::Instant;

use answers_core::{AnswerResult, QueueMessage, QueueService};
use async_trait::async_trait;
use tracing::{info, warn};

/// 为 [`QueueService`] 记录调用日志的装饰器
pub struct LoggingQueueService {
    inner: Arc<dyn QueueService>,
}

impl LoggingQueueService {
    pub fn new(inner: Arc<dyn QueueService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl QueueService for LoggingQueueService {
    async fn send_message(&self, queue_name: &str, message: &QueueMessage) -> AnswerResult<String> {
        let start = Instant::now();
        let result = self.inner.send_message(queue_name, message).await;

        match &result {
            Ok(message_id) => info!(
                method = "SendMessage",
                queue_name,
                message_type = %message.message_type(),
                message_id = %message_id,
                took = ?start.elapsed(),
            ),
            Err(err) => warn!(
                method = "SendMessage",
                queue_name,
                message_type = %message.message_type(),
                err = %err,
                took = ?start.elapsed(),
            ),
        }

        result
    }
}
