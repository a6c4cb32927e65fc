//! Answer 服务基础设施：队列地址解析、消息发布、队列与存储后端

pub mod database;
pub mod factory;
pub mod queue;

pub use database::*;
pub use factory::{BackendFactory, Backends};
pub use queue::*;
