use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{AnswerError, AnswerResult};

/// 接收消息时请求返回全部属性
pub const ALL_ATTRIBUTES: &str = "All";

/// 字符串类型属性的数据类型名
pub const STRING_DATA_TYPE: &str = "String";

/// 可见性超时上限（12 小时）
pub const MAX_VISIBILITY_TIMEOUT_SECONDS: u64 = 43_200;

/// 单条消息属性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttributeValue {
    pub data_type: String,
    pub string_value: Option<String>,
}

impl MessageAttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: STRING_DATA_TYPE.to_string(),
            string_value: Some(value.into()),
        }
    }
}

/// 创建队列时的属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAttributes {
    pub visibility_timeout: Duration,
}

impl Default for QueueAttributes {
    fn default() -> Self {
        Self {
            visibility_timeout: Duration::from_secs(60),
        }
    }
}

impl QueueAttributes {
    pub fn validate(&self) -> AnswerResult<()> {
        if self.visibility_timeout > Duration::from_secs(MAX_VISIBILITY_TIMEOUT_SECONDS) {
            return Err(AnswerError::invalid_argument(format!(
                "VisibilityTimeout must not exceed {MAX_VISIBILITY_TIMEOUT_SECONDS} seconds"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub queue_url: String,
    pub body: String,
    pub attributes: HashMap<String, MessageAttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveMessageRequest {
    pub queue_url: String,
    pub max_number_of_messages: u32,
    pub attribute_names: Vec<String>,
}

/// 从队列收到的一条消息，处理完成前一直处于不可见状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub attributes: HashMap<String, MessageAttributeValue>,
}

impl ReceivedMessage {
    /// 读取字符串属性
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|value| value.string_value.as_deref())
    }
}

/// 按请求的属性名过滤消息属性，`All` 表示全部返回
pub fn select_attributes(
    attributes: &HashMap<String, MessageAttributeValue>,
    attribute_names: &[String],
) -> HashMap<String, MessageAttributeValue> {
    if attribute_names.iter().any(|name| name == ALL_ATTRIBUTES) {
        return attributes.clone();
    }
    attributes
        .iter()
        .filter(|(name, _)| attribute_names.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_attributes() {
        let mut attributes = HashMap::new();
        attributes.insert("MessageType".to_string(), MessageAttributeValue::string("ANSWER_EVENT"));
        attributes.insert("TraceId".to_string(), MessageAttributeValue::string("t-1"));

        assert_eq!(select_attributes(&attributes, &[ALL_ATTRIBUTES.to_string()]).len(), 2);

        let selected = select_attributes(&attributes, &["TraceId".to_string()]);
        assert_eq!(selected.len(), 1);
        assert!(selected.contains_key("TraceId"));

        assert!(select_attributes(&attributes, &[]).is_empty());
    }

    #[test]
    fn test_visibility_timeout_limit() {
        let at_limit = QueueAttributes {
            visibility_timeout: Duration::from_secs(MAX_VISIBILITY_TIMEOUT_SECONDS),
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = QueueAttributes {
            visibility_timeout: Duration::from_secs(u64::MAX),
        };
        let err = over_limit.validate().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
    }
}
