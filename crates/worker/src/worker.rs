use std::sync::Arc;
use std::time::Duration;

use answers_core::{
    config::{WorkerConfig, MAX_RECEIVE_BATCH},
    AnswerResult, QueueApi, QueueAttributes, ReceiveMessageRequest, ReceivedMessage,
    ALL_ATTRIBUTES,
};
use answers_infrastructure::QueueUrlResolver;
use futures::future::join_all;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use crate::handler::QueueHandler;

/// 批内各消息任务共享的状态
struct WorkerContext {
    api: Arc<dyn QueueApi>,
    resolver: QueueUrlResolver,
    handler: Arc<dyn QueueHandler>,
    queue_name: String,
}

impl WorkerContext {
    async fn handle_message(&self, message: &ReceivedMessage) -> AnswerResult<()> {
        match self.handler.handle(message).await {
            Ok(()) => {}
            Err(err) if err.is_poison() => {
                warn!(
                    message_id = %message.message_id,
                    err = %err,
                    "消息无效，直接删除"
                );
            }
            Err(err) => return Err(err),
        }

        let queue_url = self.resolver.resolve(&self.queue_name).await?;
        self.api
            .delete_message(&queue_url, &message.receipt_handle)
            .await
    }
}

/// 队列消费循环
///
/// 每轮接收一批消息，为每条消息启动一个任务并等待整批完成后才进入下一轮。
/// 停止信号只在两轮之间检查，进行中的批次总会处理完。
pub struct Worker {
    name: String,
    context: Arc<WorkerContext>,
    max_number_of_messages: u32,
    idle_backoff: Duration,
    error_backoff: Duration,
}

impl Worker {
    pub fn builder(
        api: Arc<dyn QueueApi>,
        handler: Arc<dyn QueueHandler>,
        queue_name: impl Into<String>,
    ) -> WorkerBuilder {
        WorkerBuilder::new(api, handler, queue_name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue_name(&self) -> &str {
        &self.context.queue_name
    }

    /// 运行直到收到停止信号或信号通道关闭
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            worker = %self.name,
            queue = %self.context.queue_name,
            batch_size = self.max_number_of_messages,
            "Worker 已启动"
        );

        loop {
            if shutdown_requested(&mut shutdown_rx) {
                break;
            }

            let pause = match self.poll_once().await {
                Ok(0) => self.idle_backoff,
                Ok(_) => Duration::ZERO,
                Err(err) => {
                    error!(worker = %self.name, err = %err, "接收消息失败");
                    self.error_backoff
                }
            };

            if pause.is_zero() {
                tokio::task::yield_now().await;
            } else if wait_or_shutdown(pause, &mut shutdown_rx).await {
                break;
            }
        }

        info!(worker = %self.name, "Worker 已停止");
    }

    /// 接收并处理一批消息，返回本批消息数
    ///
    /// 单条消息的失败只记录日志，不影响同批其他消息，也不作为本轮的错误返回。
    pub async fn poll_once(&self) -> AnswerResult<usize> {
        let queue_url = self.context.resolver.resolve(&self.context.queue_name).await?;
        let messages = self
            .context
            .api
            .receive_message(ReceiveMessageRequest {
                queue_url,
                max_number_of_messages: self.max_number_of_messages,
                attribute_names: vec![ALL_ATTRIBUTES.to_string()],
            })
            .await?;

        if messages.is_empty() {
            return Ok(0);
        }

        let count = messages.len();
        debug!(worker = %self.name, count, "收到消息");

        let tasks = messages.into_iter().map(|message| {
            let context = Arc::clone(&self.context);
            tokio::spawn(async move {
                let result = context.handle_message(&message).await;
                (message.message_id, result)
            })
        });

        for joined in join_all(tasks).await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((message_id, Err(err))) => {
                    warn!(
                        worker = %self.name,
                        message_id = %message_id,
                        kind = %err.kind(),
                        err = %err,
                        "消息处理失败，等待重投"
                    );
                }
                Err(join_err) => {
                    error!(worker = %self.name, "消息处理任务异常退出: {}", join_err);
                }
            }
        }

        Ok(count)
    }
}

fn shutdown_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    match shutdown_rx.try_recv() {
        Err(TryRecvError::Empty) => false,
        Ok(()) | Err(TryRecvError::Closed) | Err(TryRecvError::Lagged(_)) => {
            info!("收到停止信号");
            true
        }
    }
}

/// 等待 `pause`，期间收到停止信号返回 `true`
async fn wait_or_shutdown(pause: Duration, shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(pause) => false,
        _ = shutdown_rx.recv() => {
            info!("收到停止信号");
            true
        }
    }
}

pub struct WorkerBuilder {
    name: String,
    api: Arc<dyn QueueApi>,
    handler: Arc<dyn QueueHandler>,
    queue_name: String,
    queue_attributes: QueueAttributes,
    max_number_of_messages: u32,
    idle_backoff: Duration,
    error_backoff: Duration,
}

impl WorkerBuilder {
    pub fn new(
        api: Arc<dyn QueueApi>,
        handler: Arc<dyn QueueHandler>,
        queue_name: impl Into<String>,
    ) -> Self {
        let defaults = WorkerConfig::default();
        Self {
            name: defaults.name,
            api,
            handler,
            queue_name: queue_name.into(),
            queue_attributes: QueueAttributes::default(),
            max_number_of_messages: defaults.max_number_of_messages,
            idle_backoff: Duration::from_millis(defaults.idle_backoff_ms),
            error_backoff: Duration::from_millis(defaults.error_backoff_ms),
        }
    }

    pub fn with_config(self, config: &WorkerConfig) -> Self {
        self.name(config.name.clone())
            .max_number_of_messages(config.max_number_of_messages)
            .idle_backoff(Duration::from_millis(config.idle_backoff_ms))
            .error_backoff(Duration::from_millis(config.error_backoff_ms))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 超出 1..=10 的取值会被截断到边界
    pub fn max_number_of_messages(mut self, max_number_of_messages: u32) -> Self {
        self.max_number_of_messages = max_number_of_messages.clamp(1, MAX_RECEIVE_BATCH);
        self
    }

    pub fn queue_attributes(mut self, queue_attributes: QueueAttributes) -> Self {
        self.queue_attributes = queue_attributes;
        self
    }

    pub fn idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff = idle_backoff;
        self
    }

    pub fn error_backoff(mut self, error_backoff: Duration) -> Self {
        self.error_backoff = error_backoff;
        self
    }

    pub fn build(self) -> Worker {
        let resolver = QueueUrlResolver::new(Arc::clone(&self.api), self.queue_attributes);
        Worker {
            name: self.name,
            context: Arc::new(WorkerContext {
                api: self.api,
                resolver,
                handler: self.handler,
                queue_name: self.queue_name,
            }),
            max_number_of_messages: self.max_number_of_messages,
            idle_backoff: self.idle_backoff,
            error_backoff: self.error_backoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answers_core::{AnswerError, ErrorKind};
    use answers_testing_utils::{wait_until, ReceivedMessageBuilder, RecordingQueueApi};
    use async_trait::async_trait;

    const QUEUE: &str = "answer-events";

    struct FailWith(fn() -> AnswerError);

    #[async_trait]
    impl QueueHandler for FailWith {
        async fn handle(&self, _message: &ReceivedMessage) -> AnswerResult<()> {
            Err((self.0)())
        }
    }

    fn worker_with(api: &Arc<RecordingQueueApi>, handler: Arc<dyn QueueHandler>) -> Worker {
        Worker::builder(api.clone(), handler, QUEUE)
            .idle_backoff(Duration::ZERO)
            .error_backoff(Duration::ZERO)
            .build()
    }

    #[tokio::test]
    async fn test_receive_requests_all_attributes_and_batch_size() {
        let api = Arc::new(RecordingQueueApi::new());
        let worker = Worker::builder(api.clone(), Arc::new(FailWith(|| unreachable!())), QUEUE)
            .max_number_of_messages(25)
            .build();

        assert_eq!(worker.poll_once().await.unwrap(), 0);

        let requests = api.receive_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_number_of_messages, MAX_RECEIVE_BATCH);
        assert_eq!(requests[0].attribute_names, vec![ALL_ATTRIBUTES.to_string()]);
        // 首次轮询时队列不存在，由 worker 自己的解析器创建
        assert_eq!(api.counts().create_queue, 1);
    }

    #[tokio::test]
    async fn test_poison_message_is_deleted() {
        let api = Arc::new(RecordingQueueApi::new());
        let worker = worker_with(
            &api,
            Arc::new(FailWith(|| AnswerError::invalid_argument("Key required"))),
        );
        api.push_batch(vec![ReceivedMessageBuilder::new().with_id("m1").build()]);

        assert_eq!(worker.poll_once().await.unwrap(), 1);
        assert_eq!(api.deleted_receipts(), vec!["receipt-m1".to_string()]);
    }

    #[tokio::test]
    async fn test_non_poison_errors_leave_message_in_queue() {
        for make in [
            (|| AnswerError::Internal("store down".to_string())) as fn() -> AnswerError,
            || AnswerError::not_found("Message type not found in attributes"),
            || AnswerError::queue("throttled"),
        ] {
            let api = Arc::new(RecordingQueueApi::new());
            let worker = worker_with(&api, Arc::new(FailWith(make)));
            api.push_batch(vec![ReceivedMessageBuilder::new().build()]);

            assert_eq!(worker.poll_once().await.unwrap(), 1);
            assert_eq!(api.counts().delete_message, 0, "{:?}", make().kind());
        }
    }

    #[tokio::test]
    async fn test_receive_failure_is_returned_from_poll() {
        let api = Arc::new(RecordingQueueApi::new());
        let worker = worker_with(&api, Arc::new(FailWith(|| unreachable!())));
        api.push_receive_failure("connection refused");

        let err = worker.poll_once().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let api = Arc::new(RecordingQueueApi::new());
        let worker = Arc::new(
            Worker::builder(api.clone(), Arc::new(FailWith(|| unreachable!())), QUEUE)
                .idle_backoff(Duration::from_secs(60))
                .build(),
        );
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = {
            let worker = Arc::clone(&worker);
            tokio::spawn(async move { worker.run(shutdown_rx).await })
        };

        assert!(wait_until(Duration::from_secs(5), || api.counts().receive_message >= 1).await);
        shutdown_tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker did not stop")
            .unwrap();
    }
}
