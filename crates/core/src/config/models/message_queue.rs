use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::BackendType;
use crate::models::{QueueAttributes, MAX_VISIBILITY_TIMEOUT_SECONDS};

/// Message queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageQueueConfig {
    pub backend: BackendType,
    /// SQLite 队列的数据库URL，仅在 sqlite 后端下使用
    pub url: String,
    /// Answer 变更事件队列名
    pub answer_event_queue: String,
    /// 创建队列时设置的可见性超时
    pub visibility_timeout_seconds: u64,
}

impl Default for MessageQueueConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Memory,
            url: "sqlite://answers-queue.db?mode=rwc".to_string(),
            answer_event_queue: "answer-events".to_string(),
            visibility_timeout_seconds: 60,
        }
    }
}

impl MessageQueueConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.answer_event_queue.is_empty() {
            return Err(anyhow::anyhow!("Answer事件队列名不能为空"));
        }

        if self.visibility_timeout_seconds == 0
            || self.visibility_timeout_seconds > MAX_VISIBILITY_TIMEOUT_SECONDS
        {
            return Err(anyhow::anyhow!(
                "可见性超时时间必须在1-{}秒之间",
                MAX_VISIBILITY_TIMEOUT_SECONDS
            ));
        }

        if self.backend == BackendType::Sqlite && !self.url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!("消息队列URL必须是SQLite格式: {}", self.url));
        }

        Ok(())
    }

    pub fn queue_attributes(&self) -> QueueAttributes {
        QueueAttributes {
            visibility_timeout: Duration::from_secs(self.visibility_timeout_seconds),
        }
    }
}
