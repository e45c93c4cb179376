//! 公共活动 handlers
//!
//! - GET /routes/events - 活动列表
//! - POST /routes/events - 创建活动（全部字段必填）

use crate::AppState;
use crate::utils::{bad_request_error, event_to_dto, normalize_required, storage_error, success};
use api_contract::{CreateEventRequest, CreatedEventDto};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use domain::PublicEvent;
use finder_storage::EventStore;
use uuid::Uuid;

/// 活动列表
pub async fn list_events(State(state): State<AppState>) -> Response {
    match state.event_store.list_events().await {
        Ok(events) => {
            let items: Vec<_> = events.into_iter().map(event_to_dto).collect();
            success(StatusCode::OK, items)
        }
        Err(err) => storage_error(err),
    }
}

/// 创建活动
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return bad_request_error("invalid json body");
    };
    let record = match event_from_request(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    match state.event_store.create_event(record).await {
        Ok(created) => success(
            StatusCode::CREATED,
            CreatedEventDto {
                event_id: created.event_id,
            },
        ),
        Err(err) => storage_error(err),
    }
}

fn event_from_request(payload: CreateEventRequest) -> Result<PublicEvent, Response> {
    Ok(PublicEvent {
        event_id: Uuid::new_v4().to_string(),
        title: normalize_required(payload.title, "title")?,
        description: normalize_required(payload.description, "description")?,
        date: normalize_required(payload.date, "date")?,
        location: normalize_required(payload.location, "location")?,
    })
}
