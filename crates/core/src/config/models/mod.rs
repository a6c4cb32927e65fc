pub mod app_config;
pub mod database;
pub mod message_queue;
pub mod worker_api;

use serde::{Deserialize, Serialize};

// Re-export main types for easier imports
pub use app_config::AppConfig;
pub use database::{is_identifier, DatabaseConfig};
pub use message_queue::MessageQueueConfig;
pub use worker_api::{ApiConfig, WorkerConfig, MAX_RECEIVE_BATCH};

/// 存储与队列后端类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    #[default]
    Memory,
    Sqlite,
}
