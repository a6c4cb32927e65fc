use answers_core::{Answer, AnswerRepository, AnswerResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// SQLite Answer 仓储，表名来自配置（已校验为合法标识符）
pub struct SqliteAnswerRepository {
    pool: SqlitePool,
    table: String,
}

impl SqliteAnswerRepository {
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    async fn upsert(&self, answer: &Answer) -> AnswerResult<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (answer_key, value, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(answer_key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(&answer.key)
            .bind(&answer.value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AnswerRepository for SqliteAnswerRepository {
    async fn create(&self, answer: &Answer) -> AnswerResult<()> {
        self.upsert(answer).await?;
        debug!("创建Answer成功: {}", answer.key);
        Ok(())
    }

    async fn update(&self, answer: &Answer) -> AnswerResult<()> {
        self.upsert(answer).await?;
        debug!("更新Answer成功: {}", answer.key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AnswerResult<()> {
        let sql = format!("DELETE FROM {} WHERE answer_key = $1", self.table);
        sqlx::query(&sql).bind(key).execute(&self.pool).await?;

        debug!("删除Answer成功: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> AnswerResult<Option<Answer>> {
        let sql = format!("SELECT answer_key, value FROM {} WHERE answer_key = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Answer {
                key: row.try_get("answer_key")?,
                value: row.try_get("value")?,
            })),
            None => Ok(None),
        }
    }
}
