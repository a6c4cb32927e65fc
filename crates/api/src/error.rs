use answers_core::{AnswerError, ErrorKind};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("业务错误: {0}")]
    Answer(#[from] AnswerError),

    #[error("请求参数错误: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Answer(err) => err.kind(),
            ApiError::BadRequest(_) => ErrorKind::InvalidArgument,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Answer(err) => err.message(),
            ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

/// 错误种类到 HTTP 状态码的映射
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument | ErrorKind::FailedPrecondition => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::Internal | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);

        // 内部错误不向调用方暴露细节
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("请求处理失败: {}", self);
            "系统内部错误".to_string()
        } else {
            self.message()
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "kind": kind.as_str(),
                "message": message,
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorKind::InvalidArgument, StatusCode::BAD_REQUEST),
            (ErrorKind::FailedPrecondition, StatusCode::BAD_REQUEST),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::AlreadyExists, StatusCode::CONFLICT),
            (ErrorKind::Unauthorized, StatusCode::UNAUTHORIZED),
            (ErrorKind::PermissionDenied, StatusCode::FORBIDDEN),
            (ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::Unknown, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in cases {
            assert_eq!(status_for(kind), status, "{kind}");
        }
    }

    #[test]
    fn test_answer_error_conversion() {
        let api_error: ApiError = AnswerError::already_exists("taken").into();
        assert_eq!(api_error.into_response().status(), StatusCode::CONFLICT);

        let api_error: ApiError = AnswerError::queue("unreachable").into();
        assert_eq!(
            api_error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_display() {
        let error = ApiError::BadRequest("missing field `key`".to_string());
        assert_eq!(error.to_string(), "请求参数错误: missing field `key`");
    }
}
