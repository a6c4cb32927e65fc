use async_trait::async_trait;

use crate::errors::AnswerResult;
use crate::models::{
    QueueAttributes, QueueMessage, ReceiveMessageRequest, ReceivedMessage, SendMessageRequest,
};

/// 底层队列系统接口（SQS 风格）
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// 创建队列并返回其地址；队列已存在时返回已有地址
    async fn create_queue(&self, name: &str, attributes: &QueueAttributes) -> AnswerResult<String>;

    /// 查询已存在队列的地址
    async fn get_queue_url(&self, name: &str) -> AnswerResult<String>;

    /// 发送消息，返回消息ID
    async fn send_message(&self, request: SendMessageRequest) -> AnswerResult<String>;

    /// 批量接收消息；收到的消息在可见性超时内对其他接收者不可见
    async fn receive_message(
        &self,
        request: ReceiveMessageRequest,
    ) -> AnswerResult<Vec<ReceivedMessage>>;

    /// 按回执句柄删除消息
    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> AnswerResult<()>;
}

/// 队列发布服务
#[async_trait]
pub trait QueueService: Send + Sync {
    /// 向逻辑队列发布消息，返回底层系统分配的消息ID
    async fn send_message(&self, queue_name: &str, message: &QueueMessage) -> AnswerResult<String>;
}
