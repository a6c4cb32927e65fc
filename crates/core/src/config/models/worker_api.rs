use serde::{Deserialize, Serialize};

/// 单次接收的消息数上限
pub const MAX_RECEIVE_BATCH: u32 = 10;

/// Worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub enabled: bool,
    pub name: String,
    pub max_number_of_messages: u32,
    /// 空轮询后的等待时间
    pub idle_backoff_ms: u64,
    /// 接收失败后的等待时间
    pub error_backoff_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "answer-event-worker".to_string(),
            max_number_of_messages: MAX_RECEIVE_BATCH,
            idle_backoff_ms: 200,
            error_backoff_ms: 1000,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.is_empty() {
            return Err(anyhow::anyhow!("Worker名称不能为空"));
        }

        if self.max_number_of_messages == 0 || self.max_number_of_messages > MAX_RECEIVE_BATCH {
            return Err(anyhow::anyhow!(
                "单次接收消息数必须在1到{}之间: {}",
                MAX_RECEIVE_BATCH,
                self.max_number_of_messages
            ));
        }

        Ok(())
    }
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:8000".to_string(),
            cors_enabled: true,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_address.is_empty() {
            return Err(anyhow::anyhow!("API绑定地址不能为空"));
        }

        if self.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(anyhow::anyhow!("无效的API绑定地址: {}", self.bind_address));
        }

        Ok(())
    }
}
