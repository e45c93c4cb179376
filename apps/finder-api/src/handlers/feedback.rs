//! 反馈 handlers
//!
//! - POST /routes/feedback/submitFeedback - 提交评分与评论
//! - GET /routes/feedback/getFeedback/:place_id - 平均评分与评论列表

use crate::AppState;
use crate::utils::{
    bad_request_error, feedback_to_dto, normalize_required, parse_rating, round2, storage_error,
    success,
};
use api_contract::{FeedbackRequest, FeedbackSummaryDto};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use domain::{FeedbackEntry, now_epoch_ms};
use finder_storage::{FeedbackStore, ensure_place_id};

/// 提交反馈
pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return bad_request_error("invalid json body");
    };
    let place_id = match normalize_required(payload.place_id, "place_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if ensure_place_id(&place_id).is_err() {
        return bad_request_error("invalid place_id");
    }
    let review = match normalize_required(payload.review, "review") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let rating = match parse_rating(payload.rating.as_ref()) {
        Ok(value) => value,
        Err(response) => return response,
    };

    let entry = FeedbackEntry {
        rating,
        review,
        ts_ms: now_epoch_ms(),
    };
    match state
        .feedback_store
        .append_feedback(&place_id, entry.clone())
        .await
    {
        Ok(()) => success(StatusCode::OK, feedback_to_dto(entry)),
        Err(err) => storage_error(err),
    }
}

/// 平均评分（两位小数）与评论列表；没有反馈时平均分为 0
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Response {
    let entries = match state.feedback_store.list_feedback(&place_id).await {
        Ok(entries) => entries,
        Err(err) => return storage_error(err),
    };
    let average_rating = if entries.is_empty() {
        0.0
    } else {
        let total: f64 = entries.iter().map(|entry| f64::from(entry.rating)).sum();
        round2(total / entries.len() as f64)
    };
    success(
        StatusCode::OK,
        FeedbackSummaryDto {
            average_rating,
            reviews: entries.into_iter().map(feedback_to_dto).collect(),
        },
    )
}
