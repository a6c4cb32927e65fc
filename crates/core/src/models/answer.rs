use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AnswerError, AnswerResult};

/// Answer 键值记录，以 key 为唯一标识
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub key: String,
    pub value: String,
}

impl Answer {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// 结构校验：key 与 value 都必须非空
    pub fn validate(&self) -> AnswerResult<()> {
        if self.key.is_empty() {
            return Err(AnswerError::invalid_argument("Key required"));
        }
        if self.value.is_empty() {
            return Err(AnswerError::invalid_argument("Value required"));
        }
        Ok(())
    }
}

/// Answer 事件类型
///
/// 线上出现的未知类型会反序列化为 `Unknown`，由 [`AnswerEventType::is_valid`] 拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerEventType {
    Create,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

impl AnswerEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerEventType::Create => "create",
            AnswerEventType::Update => "update",
            AnswerEventType::Delete => "delete",
            AnswerEventType::Unknown => "unknown",
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, AnswerEventType::Unknown)
    }
}

impl fmt::Display for AnswerEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerEventType {
    type Err = AnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AnswerEventType::Create),
            "update" => Ok(AnswerEventType::Update),
            "delete" => Ok(AnswerEventType::Delete),
            _ => Err(AnswerError::invalid_argument(format!(
                "Unknown answer event type {s}"
            ))),
        }
    }
}

/// 一次 create/update/delete 变更的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    #[serde(rename = "eventType")]
    pub event_type: AnswerEventType,
    pub data: Option<Answer>,
}

impl AnswerEvent {
    pub fn new(event_type: AnswerEventType, data: Answer) -> Self {
        Self {
            event_type,
            data: Some(data),
        }
    }

    /// 事件所属的 Answer key，事件缺少数据时为 `None`
    pub fn key(&self) -> Option<&str> {
        self.data.as_ref().map(|answer| answer.key.as_str())
    }

    /// 依次校验事件类型、事件数据及数据本身
    pub fn validate(&self) -> AnswerResult<()> {
        if !self.event_type.is_valid() {
            return Err(AnswerError::invalid_argument("EventType is not valid"));
        }
        match &self.data {
            None => Err(AnswerError::invalid_argument("EventData required")),
            Some(answer) => answer.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_validate() {
        assert!(Answer::new("a", "1").validate().is_ok());

        let err = Answer::new("", "1").validate().unwrap_err();
        assert_eq!(err.message(), "Key required");
        assert!(err.is_poison());

        let err = Answer::new("a", "").validate().unwrap_err();
        assert_eq!(err.message(), "Value required");

        // key 优先于 value 校验
        let err = Answer::new("", "").validate().unwrap_err();
        assert_eq!(err.message(), "Key required");
    }

    #[test]
    fn test_event_type_wire_format() {
        let json = serde_json::to_string(&AnswerEventType::Update).unwrap();
        assert_eq!(json, "\"update\"");

        let parsed: AnswerEventType = serde_json::from_str("\"rename\"").unwrap();
        assert_eq!(parsed, AnswerEventType::Unknown);
        assert!(!parsed.is_valid());

        assert_eq!("delete".parse::<AnswerEventType>().unwrap(), AnswerEventType::Delete);
        assert!("unknown".parse::<AnswerEventType>().is_err());
    }

    #[test]
    fn test_event_validate_order() {
        let mut event = AnswerEvent {
            event_type: AnswerEventType::Unknown,
            data: None,
        };
        assert_eq!(event.validate().unwrap_err().message(), "EventType is not valid");

        event.event_type = AnswerEventType::Create;
        assert_eq!(event.validate().unwrap_err().message(), "EventData required");

        event.data = Some(Answer::new("k", ""));
        assert_eq!(event.validate().unwrap_err().message(), "Value required");

        event.data = Some(Answer::new("k", "v"));
        assert!(event.validate().is_ok());
        assert_eq!(event.key(), Some("k"));
    }

    #[test]
    fn test_event_json_field_names() {
        let event = AnswerEvent::new(AnswerEventType::Create, Answer::new("a", "1"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"eventType": "create", "data": {"key": "a", "value": "1"}})
        );
    }
}
