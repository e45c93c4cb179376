//! 设施渲染：列表项、标记与点击动作。
//!
//! 每次渲染先同步清除旧标记，再并发补全（距离 + 照片），最后按结果顺序写入。
//! 补全期间如果又开始了新的渲染，本轮结果整体丢弃，不会补回过期标记。

use crate::backend::FacilityBackend;
use crate::distance::distance_km;
use crate::error::ClientError;
use crate::gather::{Settled, gather_settled};
use crate::photo::PhotoResolver;
use crate::session::{RenderedFacility, SharedSession};
use crate::surface::{
    CongestionLine, ListItem, MarkerSpec, PopupContent, RenderSurface, RouteSummary,
};
use api_contract::PlaceSummaryDto;
use domain::LatLng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const EMPTY_STATE_MESSAGE: &str = "No facilities found nearby.";
const DETAILS_FAILED_MESSAGE: &str = "Failed to load facility details.";
const NO_ROUTE_MESSAGE: &str = "No route found to this facility.";
const ROUTE_FAILED_MESSAGE: &str = "Failed to load directions.";
const LOCATION_UNKNOWN_MESSAGE: &str = "Your location is not available yet.";

/// 默认出行方式。
pub const DEFAULT_TRAVEL_MODE: &str = "DRIVING";

/// 渲染结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// 实际写入的设施数。
    Rendered(usize),
    /// 补全期间被更新的渲染取代。
    Superseded,
}

struct ValidFacility {
    place_id: String,
    location: LatLng,
    source: PlaceSummaryDto,
}

/// 过滤缺少 ID 或坐标的设施（记录日志后跳过），同一 ID 只保留第一条。
fn valid_facilities(results: Vec<PlaceSummaryDto>) -> Vec<ValidFacility> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter_map(|source| {
            let Some(place_id) = source
                .place_id
                .clone()
                .filter(|value| !value.trim().is_empty())
            else {
                warn!(target: "finder.client", name = %source.name, "facility_skipped_missing_id");
                return None;
            };
            let Some(location) = source
                .location()
                .map(|location| LatLng::new(location.lat, location.lng))
                .filter(LatLng::is_valid)
            else {
                warn!(target: "finder.client", place_id = %place_id, name = %source.name, "facility_skipped_missing_geometry");
                return None;
            };
            if !seen.insert(place_id.clone()) {
                debug!(target: "finder.client", place_id = %place_id, "facility_duplicate_skipped");
                return None;
            }
            Some(ValidFacility {
                place_id,
                location,
                source,
            })
        })
        .collect()
}

pub struct FacilityRenderer {
    backend: Arc<dyn FacilityBackend>,
    surface: Arc<dyn RenderSurface>,
    photos: Arc<PhotoResolver>,
    session: SharedSession,
}

impl FacilityRenderer {
    pub fn new(
        backend: Arc<dyn FacilityBackend>,
        surface: Arc<dyn RenderSurface>,
        photos: Arc<PhotoResolver>,
        session: SharedSession,
    ) -> Self {
        Self {
            backend,
            surface,
            photos,
            session,
        }
    }

    /// 清除当前列表与全部标记，返回新的渲染代数。
    fn clear(&self) -> u64 {
        self.session.with(|session| {
            let (generation, removed) = session.begin_render();
            for handle in removed {
                self.surface.remove_marker(handle);
            }
            self.surface.clear_list();
            generation
        })
    }

    /// 清空后显示空状态。
    pub fn render_empty(&self, message: &str) {
        self.clear();
        self.surface.show_empty_state(message);
    }

    async fn photo_for(&self, facility: &ValidFacility) -> Result<Option<String>, ClientError> {
        match facility.source.photos.first() {
            Some(photo) => self.photos.lookup(&photo.photo_reference).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn render(&self, results: Vec<PlaceSummaryDto>) -> RenderOutcome {
        let generation = self.clear();
        let facilities = valid_facilities(results);
        let user_location = self.session.user_location();

        let photos = gather_settled(facilities.iter().map(|facility| self.photo_for(facility))).await;

        let entries: Vec<RenderedFacility> = facilities
            .into_iter()
            .zip(photos)
            .map(|(facility, photo)| {
                let photo_url = match photo {
                    Settled::Fulfilled(Some(url)) => url,
                    Settled::Fulfilled(None) => self.photos.fallback_url().to_string(),
                    Settled::Rejected(err) => {
                        warn!(
                            target: "finder.client",
                            place_id = %facility.place_id,
                            name = %facility.source.name,
                            error = %err,
                            "facility_photo_fallback"
                        );
                        self.photos.fallback_url().to_string()
                    }
                };
                let distance_km =
                    user_location.and_then(|origin| distance_km(origin, facility.location));
                let item = ListItem {
                    place_id: facility.place_id,
                    name: facility.source.name.clone(),
                    vicinity: facility.source.vicinity.clone(),
                    location: facility.location,
                    distance_km,
                    photo_url,
                    rating: facility.source.rating,
                    open_now: facility
                        .source
                        .opening_hours
                        .as_ref()
                        .and_then(|hours| hours.open_now),
                    website: facility.source.website.clone(),
                };
                RenderedFacility {
                    source: facility.source,
                    item,
                }
            })
            .collect();

        self.session.with(|session| {
            if session.generation() != generation {
                debug!(target: "finder.client", generation, "render_superseded");
                return RenderOutcome::Superseded;
            }

            let count = entries.len();
            for entry in entries {
                self.surface.append_list_item(&entry.item);
                let marker = self.surface.add_marker(&MarkerSpec {
                    place_id: entry.item.place_id.clone(),
                    title: entry.item.name.clone(),
                    position: entry.item.location,
                });
                session.insert_rendered(entry, marker);
            }

            if count == 0 {
                self.surface.show_empty_state(EMPTY_STATE_MESSAGE);
            }
            info!(target: "finder.client", generation, count, "facilities_rendered");
            RenderOutcome::Rendered(count)
        })
    }

    /// 按当前会话顺序重绘列表（标记不变）。
    pub fn redraw_list(&self) {
        self.session.with(|session| {
            self.surface.clear_list();
            for facility in session.rendered() {
                self.surface.append_list_item(&facility.item);
            }
        });
    }

    /// 打开详情弹窗；列表项点击与标记点击都走这里。
    pub async fn open_details(&self, place_id: &str) -> Result<(), ClientError> {
        let (details, congestion) = tokio::join!(
            self.backend.facility_details(place_id),
            self.backend.congestion_average(place_id)
        );

        let details = match details {
            Ok(details) => details,
            Err(err) => {
                warn!(target: "finder.client", place_id, error = %err, "facility_details_failed");
                self.surface.notify(DETAILS_FAILED_MESSAGE);
                return Err(err);
            }
        };

        let congestion = match congestion {
            Ok(dto) => match dto.average_congestion {
                Some(average) => CongestionLine::Average(average),
                None => CongestionLine::NoData,
            },
            Err(err) => {
                warn!(target: "finder.client", place_id, error = %err, "congestion_average_failed");
                CongestionLine::Unavailable
            }
        };

        let photo_url = self
            .photos
            .resolve(
                details
                    .photos
                    .first()
                    .map(|photo| photo.photo_reference.as_str()),
            )
            .await;

        let fallback_name = self.session.with(|session| {
            session
                .facility(place_id)
                .map(|facility| facility.item.name.clone())
        });
        let content = PopupContent {
            place_id: place_id.to_string(),
            name: details.name.clone().or(fallback_name).unwrap_or_default(),
            photo_url,
            address: details.formatted_address.clone(),
            phone: details.formatted_phone_number.clone(),
            weekday_text: details
                .opening_hours
                .as_ref()
                .map(|hours| hours.weekday_text.clone())
                .unwrap_or_default(),
            rating: details.rating,
            website: details.website.clone(),
            congestion,
        };

        self.session.with(|session| {
            if session.replace_popup(place_id).is_some() {
                self.surface.close_popup();
            }
            self.surface.open_popup(&content);
        });
        Ok(())
    }

    pub fn close_details(&self) {
        self.session.with(|session| {
            if session.clear_popup().is_some() {
                self.surface.close_popup();
            }
        });
    }

    /// 从用户位置到设施的路线；无路线时返回 `Ok(None)`。
    pub async fn show_route(&self, place_id: &str) -> Result<Option<RouteSummary>, ClientError> {
        let (origin, destination) = self.session.with(|session| {
            (
                session.user_location(),
                session
                    .facility(place_id)
                    .map(|facility| facility.item.location),
            )
        });
        let Some(origin) = origin else {
            self.surface.notify(LOCATION_UNKNOWN_MESSAGE);
            return Err(ClientError::Validation("user location unknown".to_string()));
        };
        let Some(destination) = destination else {
            return Err(ClientError::Validation(format!(
                "facility {} is not rendered",
                place_id
            )));
        };

        let directions = match self
            .backend
            .directions(origin, destination, DEFAULT_TRAVEL_MODE)
            .await
        {
            Ok(directions) => directions,
            Err(err) if err.upstream_status() == Some(api_contract::STATUS_ZERO_RESULTS) => {
                self.surface.notify(NO_ROUTE_MESSAGE);
                return Ok(None);
            }
            Err(err) => {
                warn!(target: "finder.client", place_id, error = %err, "directions_failed");
                self.surface.notify(ROUTE_FAILED_MESSAGE);
                return Err(err);
            }
        };

        let Some(leg) = directions
            .routes
            .first()
            .and_then(|route| route.legs.first())
        else {
            self.surface.notify(NO_ROUTE_MESSAGE);
            return Ok(None);
        };

        let summary = RouteSummary {
            place_id: place_id.to_string(),
            distance_text: leg.distance.text.clone(),
            duration_text: leg.duration.text.clone(),
        };
        self.surface.show_route(&summary);
        Ok(Some(summary))
    }
}
