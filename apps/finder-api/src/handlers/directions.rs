//! 路线 handler
//!
//! - POST /routes/directions/directions - 计算起点到终点的路线
//!
//! 上游返回非 OK 状态（包括 ZERO_RESULTS）时以 400 返回 `UPSTREAM.<STATUS>`。

use crate::AppState;
use crate::utils::{
    bad_request_error, normalize_optional, normalize_required, success, upstream_error_with,
};
use api_contract::DirectionsRequest;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use finder_places::{DEFAULT_TRAVEL_MODE, PlacesProvider};
use tracing::info;

/// 路线计算
pub async fn directions(
    State(state): State<AppState>,
    payload: Result<Json<DirectionsRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return bad_request_error("invalid json body");
    };
    let origin = match normalize_required(payload.origin, "origin") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let destination = match normalize_required(payload.destination, "destination") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let travel_mode = normalize_optional(payload.travel_mode)
        .map(|mode| mode.to_ascii_uppercase())
        .unwrap_or_else(|| DEFAULT_TRAVEL_MODE.to_string());

    match state
        .places
        .directions(&origin, &destination, &travel_mode)
        .await
    {
        Ok(route) => {
            info!(routes = route.routes.len(), travel_mode = %travel_mode, "directions_completed");
            success(StatusCode::OK, route)
        }
        Err(err) => upstream_error_with(StatusCode::BAD_REQUEST, err),
    }
}
