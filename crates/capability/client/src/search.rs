//! 搜索编排：筛选条件 → 附近搜索 → 渲染。

use crate::backend::FacilityBackend;
use crate::error::ClientError;
use crate::renderer::{EMPTY_STATE_MESSAGE, FacilityRenderer, RenderOutcome};
use crate::session::SharedSession;
use crate::surface::RenderSurface;
use api_contract::{NearbySearchQuery, STATUS_OK, STATUS_ZERO_RESULTS};
use std::sync::Arc;
use tracing::{info, warn};

const RADIUS_REQUIRED_MESSAGE: &str = "Please enter a search radius.";
const LOCATION_REQUIRED_MESSAGE: &str = "Your location is not available yet.";

/// 用户筛选条件。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// 必填，单位米。
    pub radius_m: Option<u32>,
    pub facility_type: Option<String>,
    pub open_now: bool,
    pub min_rating: Option<f64>,
}

impl SearchFilters {
    /// 校验必填项，不涉及网络。
    pub fn validate(&self) -> Result<u32, ClientError> {
        match self.radius_m {
            Some(radius) if radius > 0 => Ok(radius),
            _ => Err(ClientError::Validation("radius required".to_string())),
        }
    }
}

/// 搜索结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Rendered(usize),
    Empty,
    Superseded,
}

pub struct SearchOrchestrator {
    backend: Arc<dyn FacilityBackend>,
    renderer: Arc<FacilityRenderer>,
    surface: Arc<dyn RenderSurface>,
    session: SharedSession,
}

impl SearchOrchestrator {
    pub fn new(
        backend: Arc<dyn FacilityBackend>,
        renderer: Arc<FacilityRenderer>,
        surface: Arc<dyn RenderSurface>,
        session: SharedSession,
    ) -> Self {
        Self {
            backend,
            renderer,
            surface,
            session,
        }
    }

    /// 非成功状态只提示错误，不改动现有列表和标记。
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchOutcome, ClientError> {
        let radius = match filters.validate() {
            Ok(radius) => radius,
            Err(err) => {
                self.surface.notify(RADIUS_REQUIRED_MESSAGE);
                return Err(err);
            }
        };
        let Some(location) = self.session.user_location() else {
            self.surface.notify(LOCATION_REQUIRED_MESSAGE);
            return Err(ClientError::Validation("user location unknown".to_string()));
        };

        let query = NearbySearchQuery {
            lat: Some(location.lat),
            lng: Some(location.lng),
            radius: Some(radius),
            facility_type: filters
                .facility_type
                .clone()
                .filter(|value| !value.trim().is_empty()),
            opennow: filters.open_now.then_some(true),
            minrating: filters.min_rating.filter(|rating| *rating > 0.0),
        };

        let response = match self.backend.nearby_search(&query).await {
            Ok(response) => response,
            Err(err) => {
                warn!(target: "finder.client", error = %err, "nearby_search_failed");
                self.surface.notify(&search_error_message(&err));
                return Err(err);
            }
        };

        match response.status.as_str() {
            STATUS_ZERO_RESULTS => {
                self.renderer.render_empty(EMPTY_STATE_MESSAGE);
                info!(target: "finder.client", radius, "nearby_search_empty");
                Ok(SearchOutcome::Empty)
            }
            STATUS_OK => match self.renderer.render(response.results).await {
                RenderOutcome::Rendered(count) => Ok(SearchOutcome::Rendered(count)),
                RenderOutcome::Superseded => Ok(SearchOutcome::Superseded),
            },
            other => {
                let err = ClientError::Upstream {
                    status: other.to_string(),
                    message: other.to_string(),
                };
                warn!(target: "finder.client", status = other, "nearby_search_rejected");
                self.surface.notify(&search_error_message(&err));
                Err(err)
            }
        }
    }
}

fn search_error_message(err: &ClientError) -> String {
    match err.upstream_status() {
        Some(status) => format!("Search failed: {}", status),
        None => "Search failed. Please try again.".to_string(),
    }
}
