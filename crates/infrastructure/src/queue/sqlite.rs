use std::collections::HashMap;

use answers_core::{
    select_attributes, AnswerError, AnswerResult, MessageAttributeValue, QueueApi,
    QueueAttributes, ReceiveMessageRequest, ReceivedMessage, SendMessageRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// 基于 SQLite 的持久化队列，API 与 worker 进程可共享同一个数据库文件
pub struct SqliteQueueApi {
    pool: SqlitePool,
}

impl SqliteQueueApi {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 创建队列相关的表
    pub async fn ensure_schema(&self) -> AnswerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS queues (
                name TEXT PRIMARY KEY,
                url TEXT NOT NULL UNIQUE,
                visibility_timeout_seconds INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS queue_messages (
                id TEXT PRIMARY KEY,
                queue_url TEXT NOT NULL,
                body TEXT NOT NULL,
                attributes TEXT NOT NULL,
                receipt_handle TEXT,
                invisible_until INTEGER NOT NULL DEFAULT 0,
                receive_count INTEGER NOT NULL DEFAULT 0,
                sent_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_queue_messages_visible ON queue_messages (queue_url, invisible_until)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn queue_url(name: &str) -> String {
        format!("sqlite://queues/{name}")
    }

    async fn visibility_timeout_ms(&self, queue_url: &str) -> AnswerResult<i64> {
        let row = sqlx::query("SELECT visibility_timeout_seconds FROM queues WHERE url = $1")
            .bind(queue_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AnswerError::not_found(format!("Queue {queue_url} does not exist")))?;

        let seconds: i64 = row.try_get("visibility_timeout_seconds")?;
        seconds.checked_mul(1000).ok_or_else(|| {
            AnswerError::queue(format!("队列 {queue_url} 的可见性超时无效: {seconds}"))
        })
    }
}

#[async_trait]
impl QueueApi for SqliteQueueApi {
    async fn create_queue(&self, name: &str, attributes: &QueueAttributes) -> AnswerResult<String> {
        if name.is_empty() {
            return Err(AnswerError::invalid_argument("Queue name required"));
        }
        attributes.validate()?;
        let visibility_timeout_seconds = i64::try_from(attributes.visibility_timeout.as_secs())
            .map_err(|_| AnswerError::invalid_argument("VisibilityTimeout out of range"))?;

        let result = sqlx::query(
            r#"
            INSERT INTO queues (name, url, visibility_timeout_seconds, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(Self::queue_url(name))
        .bind(visibility_timeout_seconds)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("创建SQLite队列: {}", name);
        }

        self.get_queue_url(name).await
    }

    async fn get_queue_url(&self, name: &str) -> AnswerResult<String> {
        let row = sqlx::query("SELECT url FROM queues WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get("url")?),
            None => Err(AnswerError::not_found(format!("Queue {name} does not exist"))),
        }
    }

    async fn send_message(&self, request: SendMessageRequest) -> AnswerResult<String> {
        // 校验队列存在
        self.visibility_timeout_ms(&request.queue_url).await?;

        let id = Uuid::new_v4().to_string();
        let attributes = serde_json::to_string(&request.attributes)?;

        sqlx::query(
            r#"
            INSERT INTO queue_messages (id, queue_url, body, attributes, sent_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&id)
        .bind(&request.queue_url)
        .bind(&request.body)
        .bind(attributes)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!("消息已写入SQLite队列 {}: {}", request.queue_url, id);
        Ok(id)
    }

    async fn receive_message(
        &self,
        request: ReceiveMessageRequest,
    ) -> AnswerResult<Vec<ReceivedMessage>> {
        let timeout_ms = self.visibility_timeout_ms(&request.queue_url).await?;
        let now = Utc::now().timestamp_millis();
        let invisible_until = now
            .checked_add(timeout_ms)
            .ok_or_else(|| AnswerError::queue("可见性截止时间溢出"))?;

        // 单条语句完成选取与隐藏，并发接收者不会拿到同一条消息
        let rows = sqlx::query(
            r#"
            UPDATE queue_messages
            SET receipt_handle = lower(hex(randomblob(16))),
                invisible_until = $1,
                receive_count = receive_count + 1
            WHERE id IN (
                SELECT id FROM queue_messages
                WHERE queue_url = $2 AND invisible_until <= $3
                ORDER BY sent_at, rowid
                LIMIT $4
            )
            RETURNING id, body, attributes, receipt_handle, sent_at
            "#,
        )
        .bind(invisible_until)
        .bind(&request.queue_url)
        .bind(now)
        .bind(i64::from(request.max_number_of_messages))
        .fetch_all(&self.pool)
        .await?;

        let mut received = Vec::with_capacity(rows.len());
        for row in rows {
            let attributes_json: String = row.try_get("attributes")?;
            let attributes: HashMap<String, MessageAttributeValue> =
                serde_json::from_str(&attributes_json)?;
            let sent_at: i64 = row.try_get("sent_at")?;

            received.push((
                sent_at,
                ReceivedMessage {
                    message_id: row.try_get("id")?,
                    receipt_handle: row.try_get("receipt_handle")?,
                    body: row.try_get("body")?,
                    attributes: select_attributes(&attributes, &request.attribute_names),
                },
            ));
        }

        // RETURNING 不保证顺序
        received.sort_by_key(|(sent_at, _)| *sent_at);
        Ok(received.into_iter().map(|(_, message)| message).collect())
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> AnswerResult<()> {
        let result =
            sqlx::query("DELETE FROM queue_messages WHERE queue_url = $1 AND receipt_handle = $2")
                .bind(queue_url)
                .bind(receipt_handle)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            debug!("回执句柄未匹配任何消息: {}", receipt_handle);
        }
        Ok(())
    }
}
