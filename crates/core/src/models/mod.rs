pub mod answer;
pub mod message;
pub mod queue;

pub use answer::{Answer, AnswerEvent, AnswerEventType};
pub use message::{
    decode_payload, AnswerEventMessage, MessageType, QueueMessage, MESSAGE_TYPE_ATTRIBUTE,
};
pub use queue::{
    select_attributes, MessageAttributeValue, QueueAttributes, ReceiveMessageRequest,
    ReceivedMessage, SendMessageRequest, ALL_ATTRIBUTES, MAX_VISIBILITY_TIMEOUT_SECONDS,
    STRING_DATA_TYPE,
};
