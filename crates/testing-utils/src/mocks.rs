//! Recording test doubles for the queue backend and the event store
//!
//! Both doubles keep their state behind `Arc<Mutex<..>>` so tests can clone a
//! handle, hand it to the code under test and inspect what happened afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use answers_core::{
    AnswerError, AnswerEvent, AnswerEventRepository, AnswerResult, QueueApi, QueueAttributes,
    ReceiveMessageRequest, ReceivedMessage, SendMessageRequest,
};
use async_trait::async_trait;

/// Number of calls made to each queue operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCallCounts {
    pub create_queue: usize,
    pub get_queue_url: usize,
    pub send_message: usize,
    pub receive_message: usize,
    pub delete_message: usize,
}

impl QueueCallCounts {
    pub fn total(&self) -> usize {
        self.create_queue
            + self.get_queue_url
            + self.send_message
            + self.receive_message
            + self.delete_message
    }
}

/// One recorded queue call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueCall {
    CreateQueue(String),
    GetQueueUrl(String),
    SendMessage(String),
    ReceiveMessage,
    DeleteMessage(String),
}

enum ScriptedReceive {
    Batch(Vec<ReceivedMessage>),
    Fail(String),
}

#[derive(Default)]
struct RecordingState {
    counts: QueueCallCounts,
    calls: Vec<QueueCall>,
    queues: HashMap<String, (String, QueueAttributes)>,
    sent: Vec<(String, SendMessageRequest)>,
    received_requests: Vec<ReceiveMessageRequest>,
    scripted: VecDeque<ScriptedReceive>,
    deleted: Vec<String>,
    fail_create_queue: Option<String>,
    fail_send_message: Option<String>,
    fail_delete_message: Option<String>,
}

/// Queue backend that records every call
///
/// `create_queue` is idempotent per name, `get_queue_url` fails for queues
/// that were never created, and `receive_message` replays scripted batches
/// (an empty batch once the script runs out).
#[derive(Clone, Default)]
pub struct RecordingQueueApi {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingQueueApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> QueueCallCounts {
        self.state.lock().unwrap().counts
    }

    pub fn reset_counts(&self) {
        let mut state = self.state.lock().unwrap();
        state.counts = QueueCallCounts::default();
        state.calls.clear();
    }

    pub fn calls(&self) -> Vec<QueueCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn created_queue_attributes(&self, name: &str) -> Option<QueueAttributes> {
        self.state
            .lock()
            .unwrap()
            .queues
            .get(name)
            .map(|(_, attributes)| *attributes)
    }

    /// Sent messages paired with the message id returned for them
    pub fn sent_messages(&self) -> Vec<(String, SendMessageRequest)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn receive_requests(&self) -> Vec<ReceiveMessageRequest> {
        self.state.lock().unwrap().received_requests.clone()
    }

    /// Receipt handles passed to `delete_message`, in call order
    pub fn deleted_receipts(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn push_batch(&self, batch: Vec<ReceivedMessage>) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .push_back(ScriptedReceive::Batch(batch));
    }

    pub fn push_receive_failure(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .push_back(ScriptedReceive::Fail(message.to_string()));
    }

    pub fn fail_create_queue(&self, message: &str) {
        self.state.lock().unwrap().fail_create_queue = Some(message.to_string());
    }

    pub fn fail_send_message(&self, message: &str) {
        self.state.lock().unwrap().fail_send_message = Some(message.to_string());
    }

    pub fn fail_delete_message(&self, message: &str) {
        self.state.lock().unwrap().fail_delete_message = Some(message.to_string());
    }
}

#[async_trait]
impl QueueApi for RecordingQueueApi {
    async fn create_queue(&self, name: &str, attributes: &QueueAttributes) -> AnswerResult<String> {
        let mut state = self.state.lock().unwrap();
        state.counts.create_queue += 1;
        state.calls.push(QueueCall::CreateQueue(name.to_string()));

        if let Some(message) = &state.fail_create_queue {
            return Err(AnswerError::queue(message.clone()));
        }

        let url = state
            .queues
            .entry(name.to_string())
            .or_insert_with(|| (format!("https://queue.test/{name}"), *attributes))
            .0
            .clone();
        Ok(url)
    }

    async fn get_queue_url(&self, name: &str) -> AnswerResult<String> {
        let mut state = self.state.lock().unwrap();
        state.counts.get_queue_url += 1;
        state.calls.push(QueueCall::GetQueueUrl(name.to_string()));

        state
            .queues
            .get(name)
            .map(|(url, _)| url.clone())
            .ok_or_else(|| AnswerError::not_found(format!("Queue {name} does not exist")))
    }

    async fn send_message(&self, request: SendMessageRequest) -> AnswerResult<String> {
        let mut state = self.state.lock().unwrap();
        state.counts.send_message += 1;
        state.calls.push(QueueCall::SendMessage(request.queue_url.clone()));

        if let Some(message) = &state.fail_send_message {
            return Err(AnswerError::queue(message.clone()));
        }

        let id = format!("msg-{}", state.sent.len() + 1);
        state.sent.push((id.clone(), request));
        Ok(id)
    }

    async fn receive_message(
        &self,
        request: ReceiveMessageRequest,
    ) -> AnswerResult<Vec<ReceivedMessage>> {
        let mut state = self.state.lock().unwrap();
        state.counts.receive_message += 1;
        state.calls.push(QueueCall::ReceiveMessage);
        state.received_requests.push(request);

        match state.scripted.pop_front() {
            Some(ScriptedReceive::Batch(batch)) => Ok(batch),
            Some(ScriptedReceive::Fail(message)) => Err(AnswerError::queue(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn delete_message(&self, _queue_url: &str, receipt_handle: &str) -> AnswerResult<()> {
        let mut state = self.state.lock().unwrap();
        state.counts.delete_message += 1;
        state
            .calls
            .push(QueueCall::DeleteMessage(receipt_handle.to_string()));

        if let Some(message) = &state.fail_delete_message {
            return Err(AnswerError::queue(message.clone()));
        }

        state.deleted.push(receipt_handle.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct EventStoreState {
    created: Vec<AnswerEvent>,
    failure: Option<String>,
}

/// Event store that records every append
#[derive(Clone, Default)]
pub struct RecordingEventRepository {
    state: Arc<Mutex<EventStoreState>>,
}

impl RecordingEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_events(&self) -> Vec<AnswerEvent> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().created.len()
    }

    /// Make every following append fail with an `Internal` error
    pub fn fail_with(&self, message: &str) {
        self.state.lock().unwrap().failure = Some(message.to_string());
    }
}

#[async_trait]
impl AnswerEventRepository for RecordingEventRepository {
    async fn create(&self, event: &AnswerEvent) -> AnswerResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.failure {
            return Err(AnswerError::Internal(message.clone()));
        }
        state.created.push(event.clone());
        Ok(())
    }

    async fn list_events(&self, key: &str) -> AnswerResult<Vec<AnswerEvent>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .created
            .iter()
            .filter(|event| event.key() == Some(key))
            .cloned()
            .collect())
    }
}
