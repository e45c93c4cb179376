//! 传感器数据 handlers
//!
//! - POST /routes/data/data - 接收一条 JSON 对象
//! - GET /routes/data - 最近若干条（写入顺序）

use crate::AppState;
use crate::utils::{bad_request_error, internal_error, storage_error, success};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use domain::{SensorReading, now_epoch_ms};
use finder_storage::SensorStore;
use serde_json::Value;
use tracing::warn;

/// 接收传感器数据
pub async fn push_sensor_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return bad_request_error("invalid json body");
    };
    if !payload.is_object() {
        return bad_request_error("body must be a json object");
    }
    let text = match serde_json::to_string(&payload) {
        Ok(text) => text,
        Err(err) => return internal_error(err.to_string()),
    };

    let reading = SensorReading {
        payload: text,
        received_at_ms: now_epoch_ms(),
    };
    match state.sensor_store.push_reading(reading).await {
        Ok(()) => success(StatusCode::CREATED, payload),
        Err(err) => storage_error(err),
    }
}

/// 最近的传感器数据
pub async fn list_sensor_data(State(state): State<AppState>) -> Response {
    let readings = match state
        .sensor_store
        .recent_readings(state.sensor_recent_limit)
        .await
    {
        Ok(readings) => readings,
        Err(err) => return storage_error(err),
    };
    let items: Vec<Value> = readings
        .into_iter()
        .filter_map(|reading| match serde_json::from_str(&reading.payload) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "sensor_payload_skipped");
                None
            }
        })
        .collect();
    success(StatusCode::OK, items)
}
