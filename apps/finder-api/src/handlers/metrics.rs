//! 营业状态与拥挤度 handlers
//!
//! - POST /routes/metrics/facilities/:facility_id/measure - 追加营业状态观测
//! - GET /routes/metrics/facilities/view - 营业状态日志（按时间升序）
//! - POST /routes/metrics/facilities/:facility_id/congestion - 追加拥挤度采样
//! - GET /routes/metrics/facilities - 按设施分组的拥挤度采样
//!
//! 营业状态只能写给已通过附近搜索注册的设施。

use crate::AppState;
use crate::utils::{
    bad_request_error, congestion_to_dto, normalize_optional, not_found_error,
    open_status_to_dto, require_bool, require_number, storage_error, success,
};
use api_contract::{CongestionSampleDto, CongestionSampleRequest, StatusCheckRequest};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use domain::{CongestionSample, OpenStatusObservation, now_epoch_ms};
use finder_storage::{CongestionStore, FacilityStore, OpenStatusStore, ensure_place_id};
use finder_telemetry::record_status_record_written;
use std::collections::BTreeMap;
use tracing::info;

/// 追加营业状态观测
///
/// # 参数
///
/// - `facility_id`: 路径参数，必须是已注册设施
/// - `payload`: `{facilityName, isOpen}`，`isOpen` 必须是 JSON 布尔值
///
/// # 返回
///
/// 成功时返回 `201 CREATED` 和带服务端时间戳的记录；
/// 设施未注册返回 `404`，`isOpen` 非布尔返回 `400`。
pub async fn record_open_status(
    State(state): State<AppState>,
    Path(facility_id): Path<String>,
    payload: Result<Json<StatusCheckRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return bad_request_error("invalid json body");
    };
    if ensure_place_id(&facility_id).is_err() {
        return bad_request_error("invalid facility id");
    }
    let is_open = match require_bool(payload.is_open.as_ref(), "isOpen") {
        Ok(value) => value,
        Err(response) => return response,
    };

    match state.facility_store.facility_exists(&facility_id).await {
        Ok(true) => {}
        Ok(false) => return not_found_error("facility not registered"),
        Err(err) => return storage_error(err),
    }

    let record = OpenStatusObservation {
        place_id: facility_id,
        facility_name: normalize_optional(payload.facility_name),
        is_open,
        ts_ms: now_epoch_ms(),
    };
    if let Err(err) = state.open_status_store.append_status(record.clone()).await {
        return storage_error(err);
    }
    record_status_record_written();
    info!(place_id = %record.place_id, is_open = record.is_open, "open_status_recorded");
    success(StatusCode::CREATED, open_status_to_dto(record))
}

/// 营业状态日志
pub async fn list_open_status(State(state): State<AppState>) -> Response {
    match state.open_status_store.list_status().await {
        Ok(records) => {
            let items: Vec<_> = records.into_iter().map(open_status_to_dto).collect();
            success(StatusCode::OK, items)
        }
        Err(err) => storage_error(err),
    }
}

/// 追加拥挤度采样
pub async fn record_congestion(
    State(state): State<AppState>,
    Path(facility_id): Path<String>,
    payload: Result<Json<CongestionSampleRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return bad_request_error("invalid json body");
    };
    if ensure_place_id(&facility_id).is_err() {
        return bad_request_error("invalid facility id");
    }
    let level = match require_number(payload.congestion_level, "congestionLevel") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if !level.is_finite() {
        return bad_request_error("congestionLevel must be a finite number");
    }

    let sample = CongestionSample {
        congestion_level: level,
        ts_ms: now_epoch_ms(),
    };
    match state
        .congestion_store
        .append_sample(&facility_id, sample.clone())
        .await
    {
        Ok(()) => success(StatusCode::OK, congestion_to_dto(sample)),
        Err(err) => storage_error(err),
    }
}

/// 全部拥挤度采样，按设施 ID 排序分组
pub async fn list_congestion(State(state): State<AppState>) -> Response {
    match state.congestion_store.list_all_samples().await {
        Ok(grouped) => {
            let items: BTreeMap<String, Vec<CongestionSampleDto>> = grouped
                .into_iter()
                .map(|(place_id, samples)| {
                    (
                        place_id,
                        samples.into_iter().map(congestion_to_dto).collect(),
                    )
                })
                .collect();
            success(StatusCode::OK, items)
        }
        Err(err) => storage_error(err),
    }
}
