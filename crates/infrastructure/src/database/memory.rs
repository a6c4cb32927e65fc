use std::collections::HashMap;

use answers_core::{
    Answer, AnswerError, AnswerEvent, AnswerEventRepository, AnswerEventType, AnswerRepository,
    AnswerResult,
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// 内存 Answer 仓储
#[derive(Default)]
pub struct InMemoryAnswerRepository {
    answers: RwLock<HashMap<String, Answer>>,
}

impl InMemoryAnswerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerRepository {
    async fn create(&self, answer: &Answer) -> AnswerResult<()> {
        self.answers
            .write()
            .await
            .insert(answer.key.clone(), answer.clone());
        debug!("创建Answer: {}", answer.key);
        Ok(())
    }

    async fn update(&self, answer: &Answer) -> AnswerResult<()> {
        self.answers
            .write()
            .await
            .insert(answer.key.clone(), answer.clone());
        debug!("更新Answer: {}", answer.key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AnswerResult<()> {
        self.answers.write().await.remove(key);
        debug!("删除Answer: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> AnswerResult<Option<Answer>> {
        Ok(self.answers.read().await.get(key).cloned())
    }
}

/// 内存事件历史仓储，以 (key, eventType) 为标识
#[derive(Default)]
pub struct InMemoryAnswerEventRepository {
    state: RwLock<EventTable>,
}

#[derive(Default)]
struct EventTable {
    sequence: u64,
    rows: HashMap<(String, AnswerEventType), (u64, AnswerEvent)>,
}

impl InMemoryAnswerEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnswerEventRepository for InMemoryAnswerEventRepository {
    async fn create(&self, event: &AnswerEvent) -> AnswerResult<()> {
        let key = event
            .key()
            .ok_or_else(|| AnswerError::invalid_argument("EventData required"))?
            .to_string();

        let mut state = self.state.write().await;
        state.sequence += 1;
        let sequence = state.sequence;
        state
            .rows
            .insert((key.clone(), event.event_type), (sequence, event.clone()));

        debug!("记录Answer事件: {} {}", key, event.event_type);
        Ok(())
    }

    async fn list_events(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>> {
        let state = self.state.read().await;
        let mut events = state
            .rows
            .iter()
            .filter(|((event_key, _), _)| event_key == key)
            .map(|(_, (sequence, event))| (*sequence, event.clone()))
            .collect::<Vec<_>>();
        events.sort_by_key(|(sequence, _)| *sequence);
        Ok(events.into_iter().map(|(_, event)| event).collect())
    }
}
