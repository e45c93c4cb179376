//! 设施 handlers
//!
//! - GET /routes/facilities/nearby - 附近搜索（成功结果写入设施注册表）
//! - GET /routes/facilities/details - 设施详情
//! - GET /routes/facilities/photo - 照片 URL（不访问上游）
//! - GET /routes/facilities/congestion/average - 平均拥挤度

use crate::AppState;
use crate::utils::{
    bad_request_error, normalize_optional, normalize_required, round2, storage_error, success,
    upstream_error,
};
use api_contract::{
    CongestionAverageDto, NearbySearchQuery, NearbySearchResponse, PhotoQuery, PhotoUrlDto,
    PlaceIdQuery, PlaceSummaryDto, STATUS_OK,
};
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Response,
};
use domain::{LatLng, RegisteredFacility};
use finder_places::{NearbySearchParams, PlacesProvider};
use finder_storage::{CongestionStore, FacilityStore};
use finder_telemetry::record_facility_registered;
use futures::future::join_all;
use tracing::{info, warn};

/// 附近搜索
///
/// 代理上游附近搜索，并把带坐标的结果写入设施注册表。
///
/// # 流程
///
/// 1. 校验 `lat`/`lng`/`radius`（缺失或越界返回 400）
/// 2. 调用 `places.nearby_search`
/// 3. 上游 `OK` 时按 `minrating` 过滤，并发写入设施注册表
/// 4. 返回 `{status, results}`，`ZERO_RESULTS` 同样返回 200
///
/// # 错误处理
///
/// - `400 BAD REQUEST`: 参数缺失或非法
/// - `502 BAD GATEWAY`: 上游非 OK 状态（`UPSTREAM.<STATUS>`）或不可达
/// - `500 INTERNAL SERVER ERROR`: 注册表写入失败
pub async fn nearby_search(
    State(state): State<AppState>,
    query: Result<Query<NearbySearchQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return bad_request_error("invalid query parameters");
    };
    let (Some(lat), Some(lng), Some(radius)) = (query.lat, query.lng, query.radius) else {
        return bad_request_error("lat, lng and radius required");
    };
    let location = LatLng::new(lat, lng);
    if !location.is_valid() {
        return bad_request_error("lat/lng out of range");
    }
    if radius == 0 {
        return bad_request_error("radius must be positive");
    }

    let params = NearbySearchParams {
        location,
        radius_m: radius,
        facility_type: normalize_optional(query.facility_type),
        open_now: query.opennow.unwrap_or(false),
    };

    let mut response = match state.places.nearby_search(&params).await {
        Ok(response) => response,
        Err(err) => return upstream_error(err),
    };

    if response.status == STATUS_OK {
        if let Some(min_rating) = query.minrating.filter(|rating| *rating > 0.0) {
            response
                .results
                .retain(|place| place.rating.is_some_and(|rating| rating >= min_rating));
        }
        if let Err(response) = register_facilities(&state, &response).await {
            return response;
        }
    }

    info!(
        status = %response.status,
        count = response.results.len(),
        "nearby_search_completed"
    );
    success(StatusCode::OK, response)
}

fn registration_record(place: &PlaceSummaryDto) -> Option<RegisteredFacility> {
    let place_id = place.place_id.clone().filter(|id| !id.is_empty())?;
    let location = place.location()?;
    Some(RegisteredFacility {
        place_id,
        name: place.name.clone(),
        types: place.types.clone(),
        location: LatLng::new(location.lat, location.lng),
    })
}

/// 并发写入设施注册表
async fn register_facilities(
    state: &AppState,
    response: &NearbySearchResponse,
) -> Result<(), Response> {
    let records: Vec<RegisteredFacility> = response
        .results
        .iter()
        .filter_map(registration_record)
        .collect();
    let count = records.len() as u64;

    let results = join_all(
        records
            .into_iter()
            .map(|record| state.facility_store.upsert_facility(record)),
    )
    .await;
    if let Some(err) = results.into_iter().find_map(Result::err) {
        warn!(error = %err, "facility_registration_failed");
        return Err(storage_error(err));
    }
    record_facility_registered(count);
    Ok(())
}

/// 设施详情
pub async fn facility_details(
    State(state): State<AppState>,
    query: Result<Query<PlaceIdQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return bad_request_error("invalid query parameters");
    };
    let place_id = match normalize_required(query.place_id, "placeId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.places.place_details(&place_id).await {
        Ok(details) => success(StatusCode::OK, details),
        Err(err) => upstream_error(err),
    }
}

/// 照片 URL
pub async fn photo_url(
    State(state): State<AppState>,
    query: Result<Query<PhotoQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return bad_request_error("invalid query parameters");
    };
    let photo_reference = match normalize_required(query.photo_reference, "photoReference") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.places.photo_url(&photo_reference) {
        Ok(url) => success(StatusCode::OK, PhotoUrlDto { url }),
        Err(err) => upstream_error(err),
    }
}

/// 平均拥挤度；无采样时 averageCongestion 为 null
pub async fn congestion_average(
    State(state): State<AppState>,
    query: Result<Query<PlaceIdQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return bad_request_error("invalid query parameters");
    };
    let place_id = match normalize_required(query.place_id, "placeId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let samples = match state.congestion_store.list_samples(&place_id).await {
        Ok(samples) => samples,
        Err(err) => return storage_error(err),
    };

    let sample_count = samples.len() as u64;
    let average_congestion = if samples.is_empty() {
        None
    } else {
        let total: f64 = samples.iter().map(|sample| sample.congestion_level).sum();
        Some(round2(total / samples.len() as f64))
    };
    success(
        StatusCode::OK,
        CongestionAverageDto {
            average_congestion,
            sample_count,
        },
    )
}
