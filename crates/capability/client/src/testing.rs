//! 测试替身：可编排的后端与记录型绘制面。

use crate::backend::FacilityBackend;
use crate::error::ClientError;
use crate::surface::{
    ListItem, MarkerHandle, MarkerIcon, MarkerSpec, PopupContent, RenderSurface, RouteSummary,
};
use api_contract::{
    CongestionAverageDto, DirectionsDto, GeometryDto, LatLngDto, NearbySearchQuery,
    NearbySearchResponse, OpenStatusRecordDto, OpeningHoursDto, PhotoDto, PlaceDetailsDto,
    PlaceSummaryDto, RouteDto, RouteLegDto, STATUS_OK, STATUS_ZERO_RESULTS, TextValueDto,
};
use async_trait::async_trait;
use domain::LatLng;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub fn place_at(place_id: &str, name: &str, lat: f64, lng: f64) -> PlaceSummaryDto {
    PlaceSummaryDto {
        place_id: Some(place_id.to_string()),
        name: name.to_string(),
        vicinity: Some(format!("{} street", name)),
        geometry: Some(GeometryDto {
            location: Some(LatLngDto { lat, lng }),
        }),
        opening_hours: Some(OpeningHoursDto {
            open_now: Some(true),
            weekday_text: Vec::new(),
        }),
        rating: Some(4.2),
        website: None,
        photos: vec![PhotoDto {
            photo_reference: format!("photo-{}", place_id),
            width: Some(400),
            height: Some(300),
        }],
        types: vec!["library".to_string()],
    }
}

pub fn place(place_id: &str, name: &str) -> PlaceSummaryDto {
    place_at(place_id, name, 37.51, 127.01)
}

pub fn place_without_geometry(place_id: &str, name: &str) -> PlaceSummaryDto {
    PlaceSummaryDto {
        geometry: None,
        ..place(place_id, name)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct BackendState {
    nearby: Option<Result<NearbySearchResponse, ClientError>>,
    nearby_calls: usize,
    last_nearby_query: Option<NearbySearchQuery>,
    photo_calls: HashMap<String, usize>,
    failing_photos: HashSet<String>,
    photo_delays: HashMap<String, u64>,
    open: HashMap<String, bool>,
    details_calls: HashMap<String, usize>,
    failing_details: HashSet<String>,
    congestion: HashMap<String, Option<f64>>,
    failing_congestion: HashSet<String>,
    fail_record: bool,
    recorded: Vec<(String, bool)>,
    directions_status: Option<String>,
}

/// 可编排的后端。
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    pub fn set_nearby(&self, status: &str, results: Vec<PlaceSummaryDto>) {
        lock(&self.state).nearby = Some(Ok(NearbySearchResponse {
            status: status.to_string(),
            results,
        }));
    }

    pub fn fail_nearby(&self, status: &str) {
        lock(&self.state).nearby = Some(Err(ClientError::Upstream {
            status: status.to_string(),
            message: status.to_string(),
        }));
    }

    pub fn nearby_calls(&self) -> usize {
        lock(&self.state).nearby_calls
    }

    pub fn last_nearby_query(&self) -> Option<NearbySearchQuery> {
        lock(&self.state).last_nearby_query.clone()
    }

    pub fn fail_photo(&self, reference: &str) {
        lock(&self.state).failing_photos.insert(reference.to_string());
    }

    pub fn heal_photo(&self, reference: &str) {
        lock(&self.state).failing_photos.remove(reference);
    }

    pub fn delay_photo(&self, reference: &str, millis: u64) {
        lock(&self.state)
            .photo_delays
            .insert(reference.to_string(), millis);
    }

    pub fn photo_calls(&self, reference: &str) -> usize {
        lock(&self.state)
            .photo_calls
            .get(reference)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_photo_calls(&self) -> usize {
        lock(&self.state).photo_calls.values().sum()
    }

    pub fn set_open(&self, place_id: &str, is_open: bool) {
        lock(&self.state).open.insert(place_id.to_string(), is_open);
    }

    pub fn fail_details(&self, place_id: &str) {
        lock(&self.state)
            .failing_details
            .insert(place_id.to_string());
    }

    pub fn details_calls(&self, place_id: &str) -> usize {
        lock(&self.state)
            .details_calls
            .get(place_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn set_congestion(&self, place_id: &str, average: Option<f64>) {
        lock(&self.state)
            .congestion
            .insert(place_id.to_string(), average);
    }

    pub fn fail_congestion(&self, place_id: &str) {
        lock(&self.state)
            .failing_congestion
            .insert(place_id.to_string());
    }

    pub fn fail_record_status(&self) {
        lock(&self.state).fail_record = true;
    }

    pub fn recorded_statuses(&self) -> Vec<(String, bool)> {
        lock(&self.state).recorded.clone()
    }

    pub fn set_directions_status(&self, status: &str) {
        lock(&self.state).directions_status = Some(status.to_string());
    }
}

#[async_trait]
impl FacilityBackend for FakeBackend {
    async fn nearby_search(
        &self,
        query: &NearbySearchQuery,
    ) -> Result<NearbySearchResponse, ClientError> {
        let mut state = lock(&self.state);
        state.nearby_calls += 1;
        state.last_nearby_query = Some(query.clone());
        state.nearby.clone().unwrap_or_else(|| {
            Ok(NearbySearchResponse {
                status: STATUS_ZERO_RESULTS.to_string(),
                results: Vec::new(),
            })
        })
    }

    async fn facility_details(&self, place_id: &str) -> Result<PlaceDetailsDto, ClientError> {
        let mut state = lock(&self.state);
        *state.details_calls.entry(place_id.to_string()).or_default() += 1;
        if state.failing_details.contains(place_id) {
            return Err(ClientError::Backend("details unavailable".to_string()));
        }
        Ok(PlaceDetailsDto {
            formatted_address: Some("1 Main St".to_string()),
            opening_hours: Some(OpeningHoursDto {
                open_now: Some(state.open.get(place_id).copied().unwrap_or(false)),
                weekday_text: vec!["Mon: 09:00-18:00".to_string()],
            }),
            ..PlaceDetailsDto::default()
        })
    }

    async fn photo_url(&self, photo_reference: &str) -> Result<String, ClientError> {
        let (delay, failing) = {
            let mut state = lock(&self.state);
            *state
                .photo_calls
                .entry(photo_reference.to_string())
                .or_default() += 1;
            (
                state.photo_delays.get(photo_reference).copied(),
                state.failing_photos.contains(photo_reference),
            )
        };
        if let Some(millis) = delay {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        if failing {
            return Err(ClientError::Backend("photo unavailable".to_string()));
        }
        Ok(format!("https://photos.test/{}", photo_reference))
    }

    async fn congestion_average(
        &self,
        place_id: &str,
    ) -> Result<CongestionAverageDto, ClientError> {
        let state = lock(&self.state);
        if state.failing_congestion.contains(place_id) {
            return Err(ClientError::Backend("congestion unavailable".to_string()));
        }
        let average = state.congestion.get(place_id).copied().flatten();
        Ok(CongestionAverageDto {
            average_congestion: average,
            sample_count: u64::from(average.is_some()),
        })
    }

    async fn record_status(
        &self,
        place_id: &str,
        facility_name: &str,
        is_open: bool,
    ) -> Result<OpenStatusRecordDto, ClientError> {
        let mut state = lock(&self.state);
        if state.fail_record {
            return Err(ClientError::Backend("store unavailable".to_string()));
        }
        state.recorded.push((place_id.to_string(), is_open));
        Ok(OpenStatusRecordDto {
            place_id: place_id.to_string(),
            facility_name: facility_name.to_string(),
            is_open,
            open_status: if is_open { "open" } else { "closed" }.to_string(),
            ts_ms: 0,
        })
    }

    async fn status_log(&self) -> Result<Vec<OpenStatusRecordDto>, ClientError> {
        let state = lock(&self.state);
        Ok(state
            .recorded
            .iter()
            .map(|(place_id, is_open)| OpenStatusRecordDto {
                place_id: place_id.clone(),
                facility_name: "unknown".to_string(),
                is_open: *is_open,
                open_status: if *is_open { "open" } else { "closed" }.to_string(),
                ts_ms: 0,
            })
            .collect())
    }

    async fn directions(
        &self,
        _origin: LatLng,
        _destination: LatLng,
        _travel_mode: &str,
    ) -> Result<DirectionsDto, ClientError> {
        let state = lock(&self.state);
        if let Some(status) = &state.directions_status {
            return Err(ClientError::Upstream {
                status: status.clone(),
                message: status.clone(),
            });
        }
        Ok(DirectionsDto {
            status: STATUS_OK.to_string(),
            routes: vec![RouteDto {
                summary: "Main road".to_string(),
                legs: vec![RouteLegDto {
                    distance: TextValueDto {
                        text: "1.2 km".to_string(),
                        value: 1200.0,
                    },
                    duration: TextValueDto {
                        text: "5 mins".to_string(),
                        value: 300.0,
                    },
                    start_address: None,
                    end_address: None,
                }],
            }],
        })
    }
}

#[derive(Default)]
struct SurfaceState {
    list: Vec<ListItem>,
    empty_states: Vec<String>,
    next_marker: u64,
    markers: HashMap<MarkerHandle, (String, MarkerIcon)>,
    popups: Vec<PopupContent>,
    close_popup_calls: usize,
    routes: Vec<RouteSummary>,
    notices: Vec<String>,
    confirm_calls: usize,
    decline_confirm: bool,
}

/// 记录全部绘制命令的绘制面。
#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
}

impl RecordingSurface {
    pub fn answer_confirm(&self, accept: bool) {
        lock(&self.state).decline_confirm = !accept;
    }

    pub fn list_items(&self) -> Vec<ListItem> {
        lock(&self.state).list.clone()
    }

    pub fn list_ids(&self) -> Vec<String> {
        lock(&self.state)
            .list
            .iter()
            .map(|item| item.place_id.clone())
            .collect()
    }

    pub fn empty_states(&self) -> Vec<String> {
        lock(&self.state).empty_states.clone()
    }

    pub fn live_marker_count(&self) -> usize {
        lock(&self.state).markers.len()
    }

    /// 当前地图上标记对应的设施 ID（排序后）。
    pub fn live_marker_places(&self) -> Vec<String> {
        let mut places: Vec<String> = lock(&self.state)
            .markers
            .values()
            .map(|(place_id, _)| place_id.clone())
            .collect();
        places.sort();
        places
    }

    pub fn icon(&self, marker: MarkerHandle) -> Option<MarkerIcon> {
        lock(&self.state).markers.get(&marker).map(|(_, icon)| *icon)
    }

    pub fn popups(&self) -> Vec<PopupContent> {
        lock(&self.state).popups.clone()
    }

    pub fn close_popup_calls(&self) -> usize {
        lock(&self.state).close_popup_calls
    }

    pub fn routes(&self) -> Vec<RouteSummary> {
        lock(&self.state).routes.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        lock(&self.state).notices.clone()
    }

    pub fn confirm_calls(&self) -> usize {
        lock(&self.state).confirm_calls
    }
}

impl RenderSurface for RecordingSurface {
    fn clear_list(&self) {
        let mut state = lock(&self.state);
        state.list.clear();
        state.empty_states.clear();
    }

    fn append_list_item(&self, item: &ListItem) {
        lock(&self.state).list.push(item.clone());
    }

    fn show_empty_state(&self, message: &str) {
        lock(&self.state).empty_states.push(message.to_string());
    }

    fn add_marker(&self, spec: &MarkerSpec) -> MarkerHandle {
        let mut state = lock(&self.state);
        state.next_marker += 1;
        let handle = MarkerHandle(state.next_marker);
        state
            .markers
            .insert(handle, (spec.place_id.clone(), MarkerIcon::Default));
        handle
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        lock(&self.state).markers.remove(&handle);
    }

    fn set_marker_icon(&self, handle: MarkerHandle, icon: MarkerIcon) {
        if let Some(entry) = lock(&self.state).markers.get_mut(&handle) {
            entry.1 = icon;
        }
    }

    fn open_popup(&self, content: &PopupContent) {
        lock(&self.state).popups.push(content.clone());
    }

    fn close_popup(&self) {
        lock(&self.state).close_popup_calls += 1;
    }

    fn show_route(&self, route: &RouteSummary) {
        lock(&self.state).routes.push(route.clone());
    }

    fn notify(&self, message: &str) {
        lock(&self.state).notices.push(message.to_string());
    }

    fn confirm(&self, _message: &str) -> bool {
        let mut state = lock(&self.state);
        state.confirm_calls += 1;
        !state.decline_confirm
    }
}
