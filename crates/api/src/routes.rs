use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use answers_core::AnswerService;

use crate::handlers::{
    answers::{create_answer, delete_answer, get_answer, get_answer_history, update_answer},
    health::health_check,
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub answer_service: Arc<dyn AnswerService>,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // Answer API
        .route("/api/answers", post(create_answer))
        .route(
            "/api/answers/{key}",
            get(get_answer).put(update_answer).delete(delete_answer),
        )
        .route("/api/answers/{key}/history", get(get_answer_history))
        .with_state(state)
}
