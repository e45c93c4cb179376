//! 杂项 handlers
//!
//! - GET /health - 存活检查
//! - GET /apiKey - 浏览器加载地图用的 key

use crate::AppState;
use crate::utils::{internal_error, success};
use api_contract::ApiKeyDto;
use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;

pub async fn health() -> Response {
    success(StatusCode::OK, json!({ "ok": true }))
}

pub async fn api_key(State(state): State<AppState>) -> Response {
    if state.places_api_key.is_empty() {
        return internal_error("api key not configured");
    }
    success(
        StatusCode::OK,
        ApiKeyDto {
            api_key: state.places_api_key.clone(),
        },
    )
}
