use std::fmt;

use thiserror::Error;

/// Answer 服务错误类型定义
///
/// 前七个变体对应调用方可见的错误种类，其余变体承载底层传输错误，
/// 按原样向上层冒泡，由传输层映射为状态码。
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("资源不存在: {0}")]
    NotFound(String),

    #[error("资源已存在: {0}")]
    AlreadyExists(String),

    #[error("前置条件不满足: {0}")]
    FailedPrecondition(String),

    #[error("内部错误: {0}")]
    Internal(String),

    #[error("未认证: {0}")]
    Unauthorized(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("消息队列错误: {0}")]
    Queue(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("配置错误: {0}")]
    Configuration(String),
}

/// 错误种类，与具体错误变体解耦，供 worker 与传输层做分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Internal,
    Unauthorized,
    PermissionDenied,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Unauthorized => "UNAUTHENTICATED",
            ErrorKind::PermissionDenied => "PERMISSION_DENIED",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnswerError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AnswerError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AnswerError::NotFound(message.into())
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        AnswerError::AlreadyExists(message.into())
    }

    pub fn queue(message: impl Into<String>) -> Self {
        AnswerError::Queue(message.into())
    }

    /// 返回错误种类；传输类错误一律归为 `Unknown`
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnswerError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AnswerError::NotFound(_) => ErrorKind::NotFound,
            AnswerError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            AnswerError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            AnswerError::Internal(_) => ErrorKind::Internal,
            AnswerError::Unauthorized(_) => ErrorKind::Unauthorized,
            AnswerError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AnswerError::Database(_)
            | AnswerError::Queue(_)
            | AnswerError::Serialization(_)
            | AnswerError::Configuration(_) => ErrorKind::Unknown,
        }
    }

    /// 消息处理失败后是否视为毒消息（删除而不是重投）
    ///
    /// 只有 `InvalidArgument` 属于毒消息，其余错误都保留消息等待可见性超时后重投。
    pub fn is_poison(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// 不带种类前缀的错误消息
    pub fn message(&self) -> String {
        match self {
            AnswerError::InvalidArgument(msg)
            | AnswerError::NotFound(msg)
            | AnswerError::AlreadyExists(msg)
            | AnswerError::FailedPrecondition(msg)
            | AnswerError::Internal(msg)
            | AnswerError::Unauthorized(msg)
            | AnswerError::PermissionDenied(msg)
            | AnswerError::Queue(msg)
            | AnswerError::Configuration(msg) => msg.clone(),
            AnswerError::Database(e) => e.to_string(),
            AnswerError::Serialization(e) => e.to_string(),
        }
    }
}

/// 统一的Result类型
pub type AnswerResult<T> = std::result::Result<T, AnswerError>;
