//! handler 测试共用的假上游与内存状态

use crate::AppState;
use api_contract::{
    DirectionsDto, GeometryDto, LatLngDto, NearbySearchResponse, PlaceDetailsDto,
    PlaceSummaryDto, STATUS_OK,
};
use async_trait::async_trait;
use axum::response::Response;
use finder_places::{NearbySearchParams, PlacesError, PlacesProvider};
use finder_storage::{
    InMemoryCongestionStore, InMemoryEventStore, InMemoryFacilityStore, InMemoryFeedbackStore,
    InMemoryOpenStatusStore, InMemorySensorStore,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakePlaces {
    nearby: Option<Result<NearbySearchResponse, PlacesError>>,
    directions_status: Option<String>,
    last_nearby: Mutex<Option<NearbySearchParams>>,
    calls: AtomicUsize,
}

impl FakePlaces {
    pub fn with_nearby(status: &str, results: Vec<PlaceSummaryDto>) -> Self {
        Self {
            nearby: Some(Ok(NearbySearchResponse {
                status: status.to_string(),
                results,
            })),
            ..Self::default()
        }
    }

    pub fn failing_nearby(status: &str) -> Self {
        Self {
            nearby: Some(Err(PlacesError::Status {
                status: status.to_string(),
                message: "quota exceeded".to_string(),
            })),
            ..Self::default()
        }
    }

    pub fn with_directions_status(status: &str) -> Self {
        Self {
            directions_status: Some(status.to_string()),
            ..Self::default()
        }
    }

    pub fn place(place_id: &str, name: &str, rating: Option<f64>) -> PlaceSummaryDto {
        PlaceSummaryDto {
            place_id: Some(place_id.to_string()),
            name: name.to_string(),
            geometry: Some(GeometryDto {
                location: Some(LatLngDto {
                    lat: 37.5,
                    lng: 127.0,
                }),
            }),
            rating,
            ..PlaceSummaryDto::default()
        }
    }

    pub fn last_nearby(&self) -> Option<NearbySearchParams> {
        self.last_nearby
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn network_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn nearby_search(
        &self,
        params: &NearbySearchParams,
    ) -> Result<NearbySearchResponse, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_nearby.lock() {
            *guard = Some(params.clone());
        }
        self.nearby.clone().unwrap_or_else(|| {
            Ok(NearbySearchResponse {
                status: STATUS_OK.to_string(),
                results: Vec::new(),
            })
        })
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsDto, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PlaceDetailsDto {
            name: Some(format!("Facility {place_id}")),
            ..PlaceDetailsDto::default()
        })
    }

    fn photo_url(&self, photo_reference: &str) -> Result<String, PlacesError> {
        Ok(format!("https://photos.test/{photo_reference}"))
    }

    async fn directions(
        &self,
        _origin: &str,
        _destination: &str,
        _travel_mode: &str,
    ) -> Result<DirectionsDto, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.directions_status.as_deref() {
            None | Some(STATUS_OK) => Ok(DirectionsDto {
                status: STATUS_OK.to_string(),
                routes: Vec::new(),
            }),
            Some(status) => Err(PlacesError::Status {
                status: status.to_string(),
                message: "no route".to_string(),
            }),
        }
    }
}

/// 内存存储 + 给定上游
pub fn state_with(places: Arc<dyn PlacesProvider>) -> AppState {
    AppState {
        places,
        facility_store: Arc::new(InMemoryFacilityStore::new()),
        open_status_store: Arc::new(InMemoryOpenStatusStore::new()),
        congestion_store: Arc::new(InMemoryCongestionStore::new()),
        feedback_store: Arc::new(InMemoryFeedbackStore::new()),
        event_store: Arc::new(InMemoryEventStore::new()),
        sensor_store: Arc::new(InMemorySensorStore::new()),
        places_api_key: "test-key".to_string(),
        sensor_recent_limit: 3,
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
