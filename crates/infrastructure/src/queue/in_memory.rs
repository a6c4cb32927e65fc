use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use answers_core::{
    select_attributes, AnswerError, AnswerResult, MessageAttributeValue, QueueApi,
    QueueAttributes, ReceiveMessageRequest, ReceivedMessage, SendMessageRequest,
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// 内存队列实现
///
/// 模拟 SQS 的语义：接收后的消息在可见性超时内对其他接收者隐藏，
/// 每次投递生成新的回执句柄，未删除的消息在超时后重新投递。
/// 仅在单进程内有效，适用于 `all` 模式与测试。
#[derive(Default)]
pub struct InMemoryQueueApi {
    state: RwLock<QueueRegistry>,
}

#[derive(Default)]
struct QueueRegistry {
    /// 队列名 -> 队列地址
    urls: HashMap<String, String>,
    /// 队列地址 -> 队列
    queues: HashMap<String, InMemoryQueue>,
}

struct InMemoryQueue {
    visibility_timeout: Duration,
    messages: VecDeque<StoredMessage>,
}

struct StoredMessage {
    id: String,
    body: String,
    attributes: HashMap<String, MessageAttributeValue>,
    receipt_handle: Option<String>,
    invisible_until: Option<Instant>,
    receive_count: u32,
}

impl StoredMessage {
    fn is_visible(&self, now: Instant) -> bool {
        self.invisible_until.map_or(true, |until| until <= now)
    }
}

impl InMemoryQueueApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue_url(name: &str) -> String {
        format!("memory://queues/{name}")
    }

    fn unknown_queue(queue_url: &str) -> AnswerError {
        AnswerError::not_found(format!("Queue {queue_url} does not exist"))
    }

    /// 队列中的消息总数（含处理中的消息）
    pub async fn queue_depth(&self, queue_url: &str) -> usize {
        let state = self.state.read().await;
        state
            .queues
            .get(queue_url)
            .map(|queue| queue.messages.len())
            .unwrap_or(0)
    }

    /// 某条消息被投递的次数
    pub async fn receive_count(&self, queue_url: &str, message_id: &str) -> Option<u32> {
        let state = self.state.read().await;
        state.queues.get(queue_url).and_then(|queue| {
            queue
                .messages
                .iter()
                .find(|message| message.id == message_id)
                .map(|message| message.receive_count)
        })
    }
}

#[async_trait]
impl QueueApi for InMemoryQueueApi {
    async fn create_queue(&self, name: &str, attributes: &QueueAttributes) -> AnswerResult<String> {
        if name.is_empty() {
            return Err(AnswerError::invalid_argument("Queue name required"));
        }
        attributes.validate()?;

        let mut state = self.state.write().await;
        if let Some(url) = state.urls.get(name) {
            return Ok(url.clone());
        }

        let url = Self::queue_url(name);
        state.urls.insert(name.to_string(), url.clone());
        state.queues.insert(
            url.clone(),
            InMemoryQueue {
                visibility_timeout: attributes.visibility_timeout,
                messages: VecDeque::new(),
            },
        );

        info!("创建内存队列: {} (可见性超时 {:?})", name, attributes.visibility_timeout);
        Ok(url)
    }

    async fn get_queue_url(&self, name: &str) -> AnswerResult<String> {
        let state = self.state.read().await;
        state
            .urls
            .get(name)
            .cloned()
            .ok_or_else(|| AnswerError::not_found(format!("Queue {name} does not exist")))
    }

    async fn send_message(&self, request: SendMessageRequest) -> AnswerResult<String> {
        let mut state = self.state.write().await;
        let queue = state
            .queues
            .get_mut(&request.queue_url)
            .ok_or_else(|| Self::unknown_queue(&request.queue_url))?;

        let id = Uuid::new_v4().to_string();
        queue.messages.push_back(StoredMessage {
            id: id.clone(),
            body: request.body,
            attributes: request.attributes,
            receipt_handle: None,
            invisible_until: None,
            receive_count: 0,
        });

        debug!("消息已写入内存队列 {}: {}", request.queue_url, id);
        Ok(id)
    }

    async fn receive_message(
        &self,
        request: ReceiveMessageRequest,
    ) -> AnswerResult<Vec<ReceivedMessage>> {
        let mut state = self.state.write().await;
        let queue = state
            .queues
            .get_mut(&request.queue_url)
            .ok_or_else(|| Self::unknown_queue(&request.queue_url))?;

        let now = Instant::now();
        let invisible_until = now.checked_add(queue.visibility_timeout).ok_or_else(|| {
            AnswerError::queue(format!(
                "可见性超时超出时间范围: {:?}",
                queue.visibility_timeout
            ))
        })?;
        let limit = request.max_number_of_messages as usize;

        let received = queue
            .messages
            .iter_mut()
            .filter(|message| message.is_visible(now))
            .take(limit)
            .map(|message| {
                let receipt_handle = Uuid::new_v4().to_string();
                message.receipt_handle = Some(receipt_handle.clone());
                message.invisible_until = Some(invisible_until);
                message.receive_count += 1;

                ReceivedMessage {
                    message_id: message.id.clone(),
                    receipt_handle,
                    body: message.body.clone(),
                    attributes: select_attributes(&message.attributes, &request.attribute_names),
                }
            })
            .collect::<Vec<_>>();

        Ok(received)
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> AnswerResult<()> {
        let mut state = self.state.write().await;
        let queue = state
            .queues
            .get_mut(queue_url)
            .ok_or_else(|| Self::unknown_queue(queue_url))?;

        let before = queue.messages.len();
        queue
            .messages
            .retain(|message| message.receipt_handle.as_deref() != Some(receipt_handle));

        if queue.messages.len() == before {
            // 句柄已过期（消息被重新投递或已删除），与 SQS 一样按成功处理
            debug!("回执句柄未匹配任何消息: {}", receipt_handle);
        }
        Ok(())
    }
}
