//! 路由定义
//!
//! 所有接口挂在 `/routes/...` 下，营业状态检查相关接口另有短路径别名：
//! - 设施：/routes/facilities/*（别名 /nearby-search、/facility-details、/photo-url、/congestion-average）
//! - 营业状态与拥挤度：/routes/metrics/*（别名 /status-check/{id}、/status-log）
//! - 反馈：/routes/feedback/*
//! - 路线：/routes/directions/directions
//! - 活动：/routes/events
//! - 传感器数据：/routes/data
//! - 其他：/apiKey、/health

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/apiKey", get(api_key))
        .route("/routes/facilities/nearby", get(nearby_search))
        .route("/nearby-search", get(nearby_search))
        .route("/routes/facilities/details", get(facility_details))
        .route("/facility-details", get(facility_details))
        .route("/routes/facilities/photo", get(photo_url))
        .route("/photo-url", get(photo_url))
        .route(
            "/routes/facilities/congestion/average",
            get(congestion_average),
        )
        .route("/congestion-average", get(congestion_average))
        .route(
            "/routes/metrics/facilities/:facility_id/measure",
            post(record_open_status),
        )
        .route("/status-check/:facility_id", post(record_open_status))
        .route("/routes/metrics/facilities/view", get(list_open_status))
        .route("/status-log", get(list_open_status))
        .route(
            "/routes/metrics/facilities/:facility_id/congestion",
            post(record_congestion),
        )
        .route("/routes/metrics/facilities", get(list_congestion))
        .route("/routes/feedback/submitFeedback", post(submit_feedback))
        .route("/routes/feedback/getFeedback/:place_id", get(get_feedback))
        .route("/routes/directions/directions", post(directions))
        .route("/routes/events", get(list_events).post(create_event))
        .route("/routes/data/data", post(push_sensor_data))
        .route("/routes/data", get(list_sensor_data))
}
