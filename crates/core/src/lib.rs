//! Answer 服务核心库：数据模型、错误类型、能力接口、配置与日志

pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod traits;

pub use errors::{AnswerError, AnswerResult, ErrorKind};
pub use models::*;
pub use traits::*;
