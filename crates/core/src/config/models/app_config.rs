use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    database::DatabaseConfig,
    message_queue::MessageQueueConfig,
    worker_api::{ApiConfig, WorkerConfig},
};
use crate::logging::LogConfig;

/// 兼容旧部署方式的环境变量：变量名 -> 配置键
const LEGACY_ENV_OVERRIDES: [(&str, &str); 3] = [
    ("ANSWER_TABLE_NAME", "database.answer_table"),
    ("ANSWER_EVENT_TABLE_NAME", "database.answer_event_table"),
    ("ANSWER_EVENT_QUEUE_NAME", "message_queue.answer_event_queue"),
];

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub message_queue: MessageQueueConfig,
    pub worker: WorkerConfig,
    pub api: ApiConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    /// Load configuration from config file and environment variables
    ///
    /// Load order:
    /// 1. Default configuration
    /// 2. Config file (TOML format)
    /// 3. Environment variable overrides (prefix: ANSWERS__, separator: __)
    /// 4. ANSWER_TABLE_NAME / ANSWER_EVENT_TABLE_NAME / ANSWER_EVENT_QUEUE_NAME
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// 与 [`AppConfig::load`] 相同，但旧式环境变量通过 `lookup` 读取
    pub fn load_with_env<F>(config_path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = toml::to_string(&AppConfig::default()).context("序列化默认配置失败")?;
        let mut builder =
            ConfigBuilder::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(path) = config_path {
            if !Path::new(path).exists() {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("ANSWERS")
                .separator("__")
                .try_parsing(true),
        );

        for (variable, key) in LEGACY_ENV_OVERRIDES {
            let value = lookup(variable).filter(|value| !value.is_empty());
            builder = builder
                .set_override_option(key, value)
                .with_context(|| format!("应用环境变量 {variable} 失败"))?;
        }

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// Validate configuration effectiveness
    pub fn validate(&self) -> Result<()> {
        self.database.validate().context("数据库配置验证失败")?;

        self.message_queue
            .validate()
            .context("消息队列配置验证失败")?;

        self.worker.validate().context("Worker配置验证失败")?;

        self.api.validate().context("API配置验证失败")?;

        Ok(())
    }
}
