use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use answers_core::{
    config::AppConfig,
    logging::{init_logging, LogConfig},
};
use clap::{Arg, ArgMatches, Command};
use tokio::signal;
use tracing::{error, info, warn};

use crate::app::{AppMode, Application};
use crate::shutdown::ShutdownManager;

/// 等待应用关闭的最长时间
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// 通用的应用启动配置
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub config_path: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl StartupConfig {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches.get_one::<String>("config").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            log_format: matches.get_one::<String>("log-format").cloned(),
        }
    }
}

/// 所有入口共用的命令行参数
pub fn common_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("配置文件路径（不指定时使用默认配置与环境变量）"),
        Arg::new("log-level")
            .short('l')
            .long("log-level")
            .value_name("LEVEL")
            .help("日志级别")
            .value_parser(["trace", "debug", "info", "warn", "error"]),
        Arg::new("log-format")
            .long("log-format")
            .value_name("FORMAT")
            .help("日志格式")
            .value_parser(["json", "pretty"]),
    ]
}

/// 加载应用配置
pub fn load_config(startup_config: &StartupConfig) -> Result<AppConfig> {
    let config_path = startup_config.config_path.as_deref();
    let mut config = AppConfig::load(config_path)
        .with_context(|| format!("加载配置失败: {}", config_path.unwrap_or("<默认配置>")))?;

    config.logging = resolve_log_config(config.logging, startup_config)?;
    Ok(config)
}

/// 日志配置优先级：命令行 > LOG_LEVEL/LOG_FORMAT > 配置文件
fn resolve_log_config(file_config: LogConfig, startup_config: &StartupConfig) -> Result<LogConfig> {
    let mut log_config = file_config.merge_env(|name| std::env::var(name).ok());

    if let Some(level) = &startup_config.log_level {
        log_config.level = level.parse().context("解析日志级别失败")?;
    }
    if let Some(format) = &startup_config.log_format {
        log_config.format = format.parse().context("解析日志格式失败")?;
    }

    Ok(log_config)
}

/// 验证指定的模式是否在配置中被启用
pub fn validate_mode_enabled(app_mode: AppMode, config: &AppConfig) -> Result<()> {
    match app_mode {
        AppMode::Worker if !config.worker.enabled => {
            Err(anyhow::anyhow!("Worker模式被禁用，请检查配置"))
        }
        AppMode::Api if !config.api.enabled => Err(anyhow::anyhow!("API模式被禁用，请检查配置")),
        _ => Ok(()),
    }
}

/// 启动应用程序的通用函数
pub async fn start_application(
    startup_config: StartupConfig,
    app_mode: AppMode,
    service_name: &str,
) -> Result<()> {
    let config = load_config(&startup_config)?;
    init_logging(&config.logging)?;

    info!("启动 {} 服务", service_name);
    info!(
        "配置文件: {}",
        startup_config.config_path.as_deref().unwrap_or("<默认配置>")
    );
    info!("运行模式: {}", app_mode);

    validate_mode_enabled(app_mode, &config)?;

    let app = Arc::new(Application::new(config, app_mode).await?);
    let shutdown_manager = ShutdownManager::new();

    let mut app_handle = {
        let shutdown_rx = shutdown_manager.subscribe().await;
        let app = Arc::clone(&app);

        tokio::spawn(async move {
            if let Err(e) = app.run(shutdown_rx).await {
                error!("应用运行失败: {e:#}");
            }
        })
    };

    // 应用提前退出（例如端口绑定失败）时不再等待信号
    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("收到关闭信号，开始优雅关闭...");
        }
        _ = &mut app_handle => {
            warn!("{} 服务提前退出", service_name);
            return Ok(());
        }
    }

    shutdown_manager.shutdown().await;

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, app_handle).await {
        Ok(Ok(())) => info!("{} 服务已优雅关闭", service_name),
        Ok(Err(e)) => error!("应用关闭时发生错误: {e}"),
        Err(_) => warn!("{} 服务关闭超时，强制退出", service_name),
    }

    info!("{} 服务已退出", service_name);
    Ok(())
}

/// 单一模式入口的命令行处理
pub async fn run_cli(name: &'static str, about: &'static str, app_mode: AppMode) -> Result<()> {
    let matches = Command::new(name)
        .version(env!("CARGO_PKG_VERSION"))
        .about(about)
        .args(common_args())
        .get_matches();

    start_application(StartupConfig::from_matches(&matches), app_mode, name).await
}

/// 等待关闭信号
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("安装Ctrl+C信号处理器失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("安装SIGTERM信号处理器失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answers_core::logging::{LogLevel, OutputFormat};

    #[test]
    fn test_cli_log_options_override_config() {
        let startup = StartupConfig {
            log_level: Some("debug".to_string()),
            log_format: Some("json".to_string()),
            ..StartupConfig::default()
        };

        let resolved = resolve_log_config(LogConfig::default(), &startup).unwrap();
        assert_eq!(resolved.level, LogLevel::Debug);
        assert_eq!(resolved.format, OutputFormat::Json);
    }

    #[test]
    fn test_disabled_mode_is_rejected() {
        let mut config = AppConfig::default();
        config.worker.enabled = false;

        assert!(validate_mode_enabled(AppMode::Worker, &config).is_err());
        assert!(validate_mode_enabled(AppMode::Api, &config).is_ok());
        assert!(validate_mode_enabled(AppMode::All, &config).is_ok());
    }

    #[test]
    fn test_common_args_parse() {
        let matches = Command::new("test")
            .args(common_args())
            .try_get_matches_from(["test", "-c", "answers.toml", "--log-format", "json"])
            .unwrap();

        let startup = StartupConfig::from_matches(&matches);
        assert_eq!(startup.config_path.as_deref(), Some("answers.toml"));
        assert_eq!(startup.log_format.as_deref(), Some("json"));
        assert!(startup.log_level.is_none());
    }
}
