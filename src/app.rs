use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use answers_api::create_app;
use answers_core::{config::AppConfig, AnswerService};
use answers_domain::new_answer_service;
use answers_infrastructure::{BackendFactory, Backends};
use answers_worker::{AnswerEventHandler, MessageDispatcher, Worker};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

/// 应用运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// 仅运行API服务器
    Api,
    /// 仅运行事件Worker
    Worker,
    /// 同一进程内运行所有组件
    All,
}

impl AppMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Api => "api",
            AppMode::Worker => "worker",
            AppMode::All => "all",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "api" => Ok(AppMode::Api),
            "worker" => Ok(AppMode::Worker),
            "all" => Ok(AppMode::All),
            _ => Err(anyhow::anyhow!("不支持的运行模式: {s}")),
        }
    }
}

/// 主应用程序
pub struct Application {
    config: AppConfig,
    mode: AppMode,
    backends: Backends,
}

impl Application {
    /// 按配置创建后端并组装应用
    pub async fn new(config: AppConfig, mode: AppMode) -> Result<Self> {
        info!("初始化应用程序，模式: {}", mode);

        let backends = BackendFactory::create(&config)
            .await
            .context("初始化存储与队列后端失败")?;

        Ok(Self::with_backends(config, mode, backends))
    }

    /// 使用外部提供的后端组装应用
    pub fn with_backends(config: AppConfig, mode: AppMode, backends: Backends) -> Self {
        Self {
            config,
            mode,
            backends,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// 运行应用程序，直到收到关闭信号
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        info!("启动应用程序，模式: {}", self.mode);

        match self.mode {
            AppMode::Api => self.run_api(shutdown_rx).await,
            AppMode::Worker => {
                self.run_worker(shutdown_rx).await;
                Ok(())
            }
            AppMode::All => {
                let api_rx = shutdown_rx.resubscribe();
                let (api_result, ()) =
                    tokio::join!(self.run_api(api_rx), self.run_worker(shutdown_rx));
                api_result
            }
        }
    }

    pub fn answer_service(&self) -> Arc<dyn AnswerService> {
        let queue_service = BackendFactory::create_queue_service(
            Arc::clone(&self.backends.queue_api),
            &self.config.message_queue,
        );

        new_answer_service(
            Arc::clone(&self.backends.answer_repository),
            Arc::clone(&self.backends.answer_event_repository),
            queue_service,
            self.config.message_queue.answer_event_queue.clone(),
        )
    }

    pub fn worker(&self) -> Worker {
        let handler = AnswerEventHandler::new(Arc::clone(&self.backends.answer_event_repository));

        Worker::builder(
            Arc::clone(&self.backends.queue_api),
            Arc::new(MessageDispatcher::new(handler)),
            self.config.message_queue.answer_event_queue.clone(),
        )
        .with_config(&self.config.worker)
        .queue_attributes(self.config.message_queue.queue_attributes())
        .build()
    }

    async fn run_api(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = &self.config.api.bind_address;
        info!("启动API服务器: {}", bind_address);

        let app = create_app(self.answer_service(), &self.config.api);
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        info!("API服务器已停止");
        Ok(())
    }

    async fn run_worker(&self, shutdown_rx: broadcast::Receiver<()>) {
        let worker = self.worker();
        info!(
            "启动Worker服务: {}，队列: {}",
            worker.name(),
            worker.queue_name()
        );
        worker.run(shutdown_rx).await;
    }
}
