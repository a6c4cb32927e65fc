use async_trait::async_trait;

use crate::errors::AnswerResult;
use crate::models::{Answer, AnswerEvent};

/// Answer 业务服务接口
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// 创建 Answer 并发布 create 事件
    async fn create_answer(&self, answer: &Answer) -> AnswerResult<()>;

    /// 更新 Answer 并发布 update 事件
    async fn update_answer(&self, answer: &Answer) -> AnswerResult<()>;

    /// 删除 Answer 并发布携带删除前数据的 delete 事件
    async fn delete_answer(&self, key: &str) -> AnswerResult<()>;

    async fn get_answer(&self, key: &str) -> AnswerResult<Answer>;

    async fn get_answer_history(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>>;
}
