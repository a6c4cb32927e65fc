use std::time::Duration;

use answers_core::{config::is_identifier, AnswerError, AnswerResult};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

/// SQLite 连接池与表结构管理
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn connect(url: &str, max_connections: u32) -> AnswerResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 创建 Answer 主表与事件表
    pub async fn migrate(&self, answer_table: &str, answer_event_table: &str) -> AnswerResult<()> {
        for table in [answer_table, answer_event_table] {
            if !is_identifier(table) {
                return Err(AnswerError::Configuration(format!("无效的表名: {table:?}")));
            }
        }

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {answer_table} (
                answer_key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {answer_event_table} (
                answer_key TEXT NOT NULL,
                event_type TEXT NOT NULL,
                value TEXT NOT NULL,
                recorded_at INTEGER NOT NULL,
                PRIMARY KEY (answer_key, event_type)
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        info!("数据表已就绪: {}, {}", answer_table, answer_event_table);
        Ok(())
    }

    pub async fn health_check(&self) -> AnswerResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
