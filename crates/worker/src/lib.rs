//! # Answer 事件 Worker
//!
//! 从事件队列批量接收消息，按 `MessageType` 属性分发给类型化处理器，
//! 并依据处理结果决定是否从队列删除消息。

pub mod answer_event;
pub mod dispatcher;
pub mod handler;
pub mod worker;

pub use answer_event::AnswerEventHandler;
pub use dispatcher::MessageDispatcher;
pub use handler::QueueHandler;
pub use worker::{Worker, WorkerBuilder};
