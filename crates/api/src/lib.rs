//! # Answers API
//!
//! Answer 键值服务的 REST 接口，基于 Axum 构建。
//!
//! ## API 端点
//!
//! - `POST /api/answers` - 创建 Answer（请求体 `{key, value}`）
//! - `GET /api/answers/{key}` - 查询 Answer
//! - `PUT /api/answers/{key}` - 更新 Answer（请求体 `{value}`）
//! - `DELETE /api/answers/{key}` - 删除 Answer
//! - `GET /api/answers/{key}/history` - 查询事件历史
//! - `GET /health` - 存活检查
//!
//! 成功响应统一为 `{success, data, message, timestamp}`，
//! 错误响应为 `{success: false, error: {kind, message}, timestamp}`。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;

use answers_core::{config::ApiConfig, AnswerService};
use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(answer_service: Arc<dyn AnswerService>, api_config: &ApiConfig) -> Router {
    let router = create_routes(AppState { answer_service }).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    );

    if api_config.cors_enabled {
        router.layer(cors_layer())
    } else {
        router
    }
}
