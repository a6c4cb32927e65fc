use answers_core::{
    Answer, AnswerError, AnswerEvent, AnswerEventRepository, AnswerEventType, AnswerResult,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// SQLite 事件历史仓储
///
/// 主键为 (answer_key, event_type)，写入同一主键时覆盖旧记录并刷新 recorded_at。
pub struct SqliteAnswerEventRepository {
    pool: SqlitePool,
    table: String,
}

impl SqliteAnswerEventRepository {
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> AnswerResult<AnswerEvent> {
        let event_type: String = row.try_get("event_type")?;
        Ok(AnswerEvent {
            event_type: event_type.parse::<AnswerEventType>()?,
            data: Some(Answer {
                key: row.try_get("answer_key")?,
                value: row.try_get("value")?,
            }),
        })
    }
}

#[async_trait]
impl AnswerEventRepository for SqliteAnswerEventRepository {
    async fn create(&self, event: &AnswerEvent) -> AnswerResult<()> {
        let answer = event
            .data
            .as_ref()
            .ok_or_else(|| AnswerError::invalid_argument("EventData required"))?;

        let sql = format!(
            r#"
            INSERT INTO {} (answer_key, event_type, value, recorded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(answer_key, event_type) DO UPDATE SET
                value = excluded.value,
                recorded_at = excluded.recorded_at
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(&answer.key)
            .bind(event.event_type.as_str())
            .bind(&answer.value)
            .bind(Utc::now().timestamp_micros())
            .execute(&self.pool)
            .await?;

        debug!("记录Answer事件成功: {} {}", answer.key, event.event_type);
        Ok(())
    }

    async fn list_events(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>> {
        let sql = format!(
            "SELECT answer_key, event_type, value FROM {} WHERE answer_key = $1 ORDER BY recorded_at, event_type",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_event).collect()
    }
}
