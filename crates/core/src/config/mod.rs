//! 配置管理
//!
//! 配置按以下顺序叠加：内置默认值、TOML 配置文件、`ANSWERS__` 前缀环境变量，
//! 最后是兼容旧部署的 `ANSWER_TABLE_NAME`、`ANSWER_EVENT_TABLE_NAME` 和
//! `ANSWER_EVENT_QUEUE_NAME`。

pub mod models;

pub use models::{
    is_identifier, ApiConfig, AppConfig, BackendType, DatabaseConfig, MessageQueueConfig,
    WorkerConfig, MAX_RECEIVE_BATCH,
};
