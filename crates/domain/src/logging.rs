use std::sync::Arc;
use std::time::Instant;

use answers_core::{Answer, AnswerError, AnswerEvent, AnswerResult, AnswerService};
use async_trait::async_trait;
use tracing::{info, warn};

/// 为 [`AnswerService`] 记录每次调用的方法、key、结果与耗时
pub struct LoggingAnswerService {
    inner: Arc<dyn AnswerService>,
}

impl LoggingAnswerService {
    pub fn new(inner: Arc<dyn AnswerService>) -> Self {
        Self { inner }
    }
}

fn log_call<T>(method: &str, key: &str, start: Instant, result: &AnswerResult<T>) {
    match result {
        Ok(_) => info!(method, key, took = ?start.elapsed()),
        Err(err) => log_failure(method, key, start, err),
    }
}

fn log_failure(method: &str, key: &str, start: Instant, err: &AnswerError) {
    warn!(method, key, kind = %err.kind(), err = %err, took = ?start.elapsed());
}

#[async_trait]
impl AnswerService for LoggingAnswerService {
    async fn create_answer(&self, answer: &Answer) -> AnswerResult<()> {
        let start = Instant::now();
        let result = self.inner.create_answer(answer).await;
        log_call("CreateAnswer", &answer.key, start, &result);
        result
    }

    async fn update_answer(&self, answer: &Answer) -> AnswerResult<()> {
        let start = Instant::now();
        let result = self.inner.update_answer(answer).await;
        log_call("UpdateAnswer", &answer.key, start, &result);
        result
    }

    async fn delete_answer(&self, key: &str) -> AnswerResult<()> {
        let start = Instant::now();
        let result = self.inner.delete_answer(key).await;
        log_call("DeleteAnswer", key, start, &result);
        result
    }

    async fn get_answer(&self, key: &str) -> AnswerResult<Answer> {
        let start = Instant::now();
        let result = self.inner.get_answer(key).await;
        log_call("GetAnswer", key, start, &result);
        result
    }

    async fn get_answer_history(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>> {
        let start = Instant::now();
        let result = self.inner.get_answer_history(key).await;
        if let Ok(events) = &result {
            info!(method = "GetAnswerHistory", key, events = events.len(), took = ?start.elapsed());
        } else {
            log_call("GetAnswerHistory", key, start, &result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answers_core::ErrorKind;

    struct Fixed;

    #[async_trait]
    impl AnswerService for Fixed {
        async fn create_answer(&self, _answer: &Answer) -> AnswerResult<()> {
            Ok(())
        }
        async fn update_answer(&self, _answer: &Answer) -> AnswerResult<()> {
            Err(AnswerError::not_found("Answer with the provided key not found"))
        }
        async fn delete_answer(&self, _key: &str) -> AnswerResult<()> {
            Ok(())
        }
        async fn get_answer(&self, key: &str) -> AnswerResult<Answer> {
            Ok(Answer::new(key, "v"))
        }
        async fn get_answer_history(&self, _key: &str) -> AnswerResult<Vec<AnswerEvent>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_decorator_passes_results_through() {
        let service = LoggingAnswerService::new(Arc::new(Fixed));

        service.create_answer(&Answer::new("a", "1")).await.unwrap();
        assert_eq!(service.get_answer("a").await.unwrap(), Answer::new("a", "v"));
        assert!(service.get_answer_history("a").await.unwrap().is_empty());

        let err = service
            .update_answer(&Answer::new("a", "1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
