use answers_core::{AnswerResult, ReceivedMessage};
use async_trait::async_trait;

/// 单条队列消息的处理入口
///
/// 返回 `InvalidArgument` 表示消息无法处理，worker 会删除它；
/// 其他错误会让消息留在队列中，等待可见性超时后重投。
#[async_trait]
pub trait QueueHandler: Send + Sync {
    async fn handle(&self, message: &ReceivedMessage) -> AnswerResult<()>;
}
