use std::sync::Arc;

use answers_core::{
    config::{AppConfig, BackendType, DatabaseConfig, MessageQueueConfig},
    AnswerEventRepository, AnswerRepository, AnswerResult, QueueApi, QueueService,
};
use tracing::{debug, info};

use crate::database::{
    DatabaseManager, InMemoryAnswerEventRepository, InMemoryAnswerRepository,
    SqliteAnswerEventRepository, SqliteAnswerRepository,
};
use crate::queue::{InMemoryQueueApi, LoggingQueueService, QueuePublisher, SqliteQueueApi};

/// 按配置构建的后端集合
#[derive(Clone)]
pub struct Backends {
    pub queue_api: Arc<dyn QueueApi>,
    pub answer_repository: Arc<dyn AnswerRepository>,
    pub answer_event_repository: Arc<dyn AnswerEventRepository>,
}

pub struct BackendFactory;

impl BackendFactory {
    pub async fn create(config: &AppConfig) -> AnswerResult<Backends> {
        let queue_api = Self::create_queue_api(&config.message_queue).await?;
        let (answer_repository, answer_event_repository) =
            Self::create_repositories(&config.database).await?;

        Ok(Backends {
            queue_api,
            answer_repository,
            answer_event_repository,
        })
    }

    pub async fn create_queue_api(config: &MessageQueueConfig) -> AnswerResult<Arc<dyn QueueApi>> {
        debug!("Creating queue backend with type: {:?}", config.backend);

        match config.backend {
            BackendType::Memory => {
                info!("Initializing in-memory queue");
                Ok(Arc::new(InMemoryQueueApi::new()))
            }
            BackendType::Sqlite => {
                info!("Initializing SQLite queue: {}", config.url);
                let manager = DatabaseManager::connect(&config.url, 5).await?;
                let api = SqliteQueueApi::new(manager.pool().clone());
                api.ensure_schema().await?;
                Ok(Arc::new(api))
            }
        }
    }

    pub async fn create_repositories(
        config: &DatabaseConfig,
    ) -> AnswerResult<(Arc<dyn AnswerRepository>, Arc<dyn AnswerEventRepository>)> {
        debug!("Creating storage backend with type: {:?}", config.backend);

        match config.backend {
            BackendType::Memory => {
                info!("Initializing in-memory storage");
                Ok((
                    Arc::new(InMemoryAnswerRepository::new()),
                    Arc::new(InMemoryAnswerEventRepository::new()),
                ))
            }
            BackendType::Sqlite => {
                info!("Initializing SQLite storage: {}", config.url);
                let manager = DatabaseManager::connect(&config.url, config.max_connections).await?;
                manager
                    .migrate(&config.answer_table, &config.answer_event_table)
                    .await?;

                let pool = manager.pool().clone();
                Ok((
                    Arc::new(SqliteAnswerRepository::new(pool.clone(), &config.answer_table)),
                    Arc::new(SqliteAnswerEventRepository::new(
                        pool,
                        &config.answer_event_table,
                    )),
                ))
            }
        }
    }

    /// 带日志装饰的队列发布服务
    pub fn create_queue_service(
        queue_api: Arc<dyn QueueApi>,
        config: &MessageQueueConfig,
    ) -> Arc<dyn QueueService> {
        let publisher = QueuePublisher::new(queue_api, config.queue_attributes());
        Arc::new(LoggingQueueService::new(Arc::new(publisher)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answers_core::{Answer, AnswerEvent, AnswerEventMessage, AnswerEventType, QueueMessage};

    #[tokio::test]
    async fn test_memory_backends_are_wired() {
        let config = AppConfig::default();
        let backends = BackendFactory::create(&config).await.unwrap();

        backends
            .answer_repository
            .create(&Answer::new("a", "1"))
            .await
            .unwrap();
        assert!(backends.answer_repository.get("a").await.unwrap().is_some());

        let queue_service =
            BackendFactory::create_queue_service(backends.queue_api.clone(), &config.message_queue);
        let message: QueueMessage =
            AnswerEventMessage::new(AnswerEvent::new(AnswerEventType::Create, Answer::new("a", "1")))
                .into();
        queue_service
            .send_message(&config.message_queue.answer_event_queue, &message)
            .await
            .unwrap();

        let url = backends
            .queue_api
            .get_queue_url(&config.message_queue.answer_event_queue)
            .await
            .unwrap();
        assert!(url.ends_with("answer-events"));
    }

    #[tokio::test]
    async fn test_sqlite_backends_are_migrated() {
        let mut config = AppConfig::default();
        config.database.backend = BackendType::Sqlite;
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;

        let (answers, events) = BackendFactory::create_repositories(&config.database)
            .await
            .unwrap();
        answers.create(&Answer::new("k", "v")).await.unwrap();
        events
            .create(&AnswerEvent::new(AnswerEventType::Create, Answer::new("k", "v")))
            .await
            .unwrap();
        assert_eq!(events.list_events("k").await.unwrap().len(), 1);
    }
}
