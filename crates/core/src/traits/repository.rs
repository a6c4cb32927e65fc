use async_trait::async_trait;

use crate::errors::AnswerResult;
use crate::models::{Answer, AnswerEvent};

/// Answer 主表仓储
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create(&self, answer: &Answer) -> AnswerResult<()>;

    async fn update(&self, answer: &Answer) -> AnswerResult<()>;

    async fn delete(&self, key: &str) -> AnswerResult<()>;

    /// 按 key 查询，不存在时返回 `None`
    async fn get(&self, key: &str) -> AnswerResult<Option<Answer>>;
}

/// Answer 事件历史仓储
///
/// 记录以 (key, eventType) 为标识，同一标识的后写记录覆盖先写记录。
#[async_trait]
pub trait AnswerEventRepository: Send + Sync {
    async fn create(&self, event: &AnswerEvent) -> AnswerResult<()>;

    /// 列出某个 key 的全部事件，按最近写入时间升序
    async fn list_events(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>>;
}
