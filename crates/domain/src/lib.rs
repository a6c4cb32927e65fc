//! # Answer 领域层
//!
//! 提供 [`AnswerService`] 的业务实现和日志装饰器，以及把两者组合起来的
//! [`new_answer_service`]。

use std::sync::Arc;

use answers_core::{AnswerEventRepository, AnswerRepository, AnswerService, QueueService};

pub mod logging;
pub mod service;

pub use logging::LoggingAnswerService;
pub use service::AnswerServiceImpl;

/// 组装带日志装饰的 Answer 服务
pub fn new_answer_service(
    repository: Arc<dyn AnswerRepository>,
    event_repository: Arc<dyn AnswerEventRepository>,
    queue_service: Arc<dyn QueueService>,
    event_queue_name: impl Into<String>,
) -> Arc<dyn AnswerService> {
    let service = AnswerServiceImpl::new(
        repository,
        event_repository,
        queue_service,
        event_queue_name,
    );
    Arc::new(LoggingAnswerService::new(Arc::new(service)))
}
