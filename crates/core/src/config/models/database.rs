use serde::{Deserialize, Serialize};

use super::BackendType;

/// 存储配置：Answer 主表与事件历史表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: BackendType,
    pub url: String,
    pub max_connections: u32,
    pub answer_table: String,
    pub answer_event_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Memory,
            url: "sqlite://answers.db?mode=rwc".to_string(),
            max_connections: 5,
            answer_table: "answers".to_string(),
            answer_event_table: "answer_events".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend == BackendType::Sqlite && !self.url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!("数据库URL必须是SQLite格式: {}", self.url));
        }

        if self.max_connections == 0 {
            return Err(anyhow::anyhow!("最大连接数必须大于0"));
        }

        if !is_identifier(&self.answer_table) {
            return Err(anyhow::anyhow!("无效的Answer表名: {:?}", self.answer_table));
        }

        if !is_identifier(&self.answer_event_table) {
            return Err(anyhow::anyhow!(
                "无效的Answer事件表名: {:?}",
                self.answer_event_table
            ));
        }

        if self.answer_table == self.answer_event_table {
            return Err(anyhow::anyhow!("Answer表与事件表不能同名"));
        }

        Ok(())
    }
}

/// 表名只允许字母、数字和下划线，且不能以数字开头
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
