use answers_core::Answer;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    error::ApiResult,
    response::{created, success, success_message},
    routes::AppState,
};

/// Answer 创建请求
#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    pub key: String,
    pub value: String,
}

/// Answer 更新请求，key 来自路径
#[derive(Debug, Deserialize)]
pub struct UpdateAnswerRequest {
    pub value: String,
}

pub async fn create_answer(
    State(state): State<AppState>,
    payload: Result<Json<CreateAnswerRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let answer = Answer::new(request.key, request.value);

    state.answer_service.create_answer(&answer).await?;
    Ok(created(answer))
}

pub async fn update_answer(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<UpdateAnswerRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let answer = Answer::new(key, request.value);

    state.answer_service.update_answer(&answer).await?;
    Ok(success(answer))
}

pub async fn delete_answer(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.answer_service.delete_answer(&key).await?;
    Ok(success_message(format!("Answer {key} deleted")))
}

pub async fn get_answer(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let answer = state.answer_service.get_answer(&key).await?;
    Ok(success(answer))
}

/// 事件历史由 worker 异步写入，刚完成的写操作可能尚未出现在结果中
pub async fn get_answer_history(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let events = state.answer_service.get_answer_history(&key).await?;
    Ok(success(events))
}
