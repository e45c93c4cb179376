//! HTTP 响应辅助函数和 DTO 转换
//!
//! 错误响应统一使用 ApiResponse 封装：
//! - bad_request_error：INVALID.REQUEST（400）
//! - not_found_error：RESOURCE.NOT_FOUND（404）
//! - upstream_error：UPSTREAM.<STATUS> / UPSTREAM.UNAVAILABLE（502）
//! - storage_error / internal_error：INTERNAL.ERROR（500）

use api_contract::{ApiResponse, CongestionSampleDto, EventDto, FeedbackDto, OpenStatusRecordDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{CongestionSample, FeedbackEntry, OpenStatusObservation, PublicEvent};
use finder_places::PlacesError;
use finder_storage::StorageError;
use tracing::warn;

/// 设施名缺失时的显示值。
pub const UNKNOWN_FACILITY_NAME: &str = "unknown";

/// 成功响应
pub fn success<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::success(data))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", message.into())),
    )
        .into_response()
}

/// 内部错误响应
pub fn internal_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message.into())),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    warn!(error = %err, "storage_failed");
    internal_error(err.to_string())
}

/// 上游错误响应，业务状态错误使用给定状态码
pub fn upstream_error_with(status_code: StatusCode, err: PlacesError) -> Response {
    match err {
        PlacesError::Status { status, message } => (
            status_code,
            Json(ApiResponse::<()>::error(
                format!("UPSTREAM.{}", status),
                message,
            )),
        )
            .into_response(),
        PlacesError::Http(message) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::<()>::error("UPSTREAM.UNAVAILABLE", message)),
        )
            .into_response(),
        PlacesError::Decode(message) => internal_error(message),
    }
}

/// 上游错误响应（502）
pub fn upstream_error(err: PlacesError) -> Response {
    upstream_error_with(StatusCode::BAD_GATEWAY, err)
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// OpenStatusObservation 转 OpenStatusRecordDto
pub fn open_status_to_dto(record: OpenStatusObservation) -> OpenStatusRecordDto {
    OpenStatusRecordDto {
        place_id: record.place_id,
        facility_name: record
            .facility_name
            .unwrap_or_else(|| UNKNOWN_FACILITY_NAME.to_string()),
        is_open: record.is_open,
        open_status: if record.is_open { "open" } else { "closed" }.to_string(),
        ts_ms: record.ts_ms,
    }
}

/// CongestionSample 转 CongestionSampleDto
pub fn congestion_to_dto(sample: CongestionSample) -> CongestionSampleDto {
    CongestionSampleDto {
        congestion_level: sample.congestion_level,
        ts_ms: sample.ts_ms,
    }
}

/// FeedbackEntry 转 FeedbackDto
pub fn feedback_to_dto(entry: FeedbackEntry) -> FeedbackDto {
    FeedbackDto {
        review: entry.review,
        rating: entry.rating,
        ts_ms: entry.ts_ms,
    }
}

/// PublicEvent 转 EventDto
pub fn event_to_dto(record: PublicEvent) -> EventDto {
    EventDto {
        event_id: record.event_id,
        title: record.title,
        description: record.description,
        date: record.date,
        location: record.location,
    }
}
