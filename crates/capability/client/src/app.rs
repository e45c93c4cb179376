//! 客户端入口：组装各组件并分发界面事件。

use crate::backend::FacilityBackend;
use crate::error::{ClientError, StatusCheckError};
use crate::favorites::{FavoriteOutcome, add_favorite};
use crate::photo::PhotoResolver;
use crate::poller::{PollerState, StatusPoller};
use crate::renderer::{FacilityRenderer, RenderOutcome};
use crate::search::{SearchFilters, SearchOrchestrator, SearchOutcome};
use crate::session::SharedSession;
use crate::sort::{SortOrder, sort_facilities};
use crate::status::{CheckMode, StatusCheckOutcome, StatusChecker};
use crate::surface::{MarkerHandle, RenderSurface};
use api_contract::OpenStatusRecordDto;
use domain::LatLng;
use finder_config::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

const FAVORITE_ADDED_MESSAGE: &str = "Added to favorites.";
const FAVORITE_EXISTS_MESSAGE: &str = "Already in favorites.";
const NO_FAVORITES_MESSAGE: &str = "No favorites yet.";

/// 界面事件。
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Search(SearchFilters),
    ListItemClicked(String),
    MarkerClicked(MarkerHandle),
    PopupClosed,
    StatusCheckClicked(String),
    RouteClicked(String),
    FavoriteClicked(String),
    ShowFavorites,
    Sort(SortOrder),
    TogglePolling,
}

pub struct FinderClient {
    backend: Arc<dyn FacilityBackend>,
    surface: Arc<dyn RenderSurface>,
    session: SharedSession,
    renderer: Arc<FacilityRenderer>,
    search: SearchOrchestrator,
    checker: Arc<StatusChecker>,
    poller: Mutex<StatusPoller>,
}

impl FinderClient {
    pub fn new(
        backend: Arc<dyn FacilityBackend>,
        surface: Arc<dyn RenderSurface>,
        config: &ClientConfig,
    ) -> Self {
        let session = SharedSession::new();
        let photos = Arc::new(PhotoResolver::new(
            backend.clone(),
            config.fallback_image_url.clone(),
        ));
        let renderer = Arc::new(FacilityRenderer::new(
            backend.clone(),
            surface.clone(),
            photos,
            session.clone(),
        ));
        let search = SearchOrchestrator::new(
            backend.clone(),
            renderer.clone(),
            surface.clone(),
            session.clone(),
        );
        let checker = Arc::new(StatusChecker::new(
            backend.clone(),
            surface.clone(),
            session.clone(),
        ));
        let poller = StatusPoller::new(
            checker.clone(),
            surface.clone(),
            session.clone(),
            Duration::from_secs(config.status_poll_interval_seconds.max(1)),
        );
        Self {
            backend,
            surface,
            session,
            renderer,
            search,
            checker,
            poller: Mutex::new(poller),
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn set_user_location(&self, location: LatLng) {
        self.session.set_user_location(location);
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchOutcome, ClientError> {
        self.search.search(filters).await
    }

    /// 手动检查单个设施（交互模式）。
    pub async fn check_status(
        &self,
        place_id: &str,
    ) -> Result<StatusCheckOutcome, StatusCheckError> {
        let name = self
            .session
            .with(|session| session.facility(place_id).map(|facility| facility.item.name.clone()))
            .unwrap_or_else(|| place_id.to_string());
        self.checker
            .check_open_status(place_id, &name, CheckMode::Interactive)
            .await
    }

    pub async fn toggle_polling(&self) -> PollerState {
        self.poller.lock().await.toggle().await
    }

    pub async fn polling_state(&self) -> PollerState {
        self.poller.lock().await.state()
    }

    /// 停止轮询（如果正在运行）。
    pub async fn shutdown(&self) {
        self.poller.lock().await.deactivate().await;
    }

    pub fn sort(&self, order: SortOrder) {
        self.session
            .with(|session| sort_facilities(session.rendered_mut(), order));
        self.renderer.redraw_list();
    }

    pub fn add_favorite(&self, place_id: &str) -> FavoriteOutcome {
        let outcome = self
            .session
            .with(|session| add_favorite(session, place_id));
        match outcome {
            FavoriteOutcome::Added => self.surface.notify(FAVORITE_ADDED_MESSAGE),
            FavoriteOutcome::AlreadyPresent => self.surface.notify(FAVORITE_EXISTS_MESSAGE),
            FavoriteOutcome::Unknown => {
                debug!(target: "finder.client", place_id, "favorite_unknown_facility");
            }
        }
        outcome
    }

    /// 通过常规渲染流程显示收藏。
    pub async fn show_favorites(&self) -> RenderOutcome {
        let favorites = self.session.with(|session| session.favorites().to_vec());
        if favorites.is_empty() {
            self.surface.notify(NO_FAVORITES_MESSAGE);
            return RenderOutcome::Rendered(0);
        }
        self.renderer.render(favorites).await
    }

    pub async fn status_log(&self) -> Result<Vec<OpenStatusRecordDto>, ClientError> {
        self.backend.status_log().await
    }

    /// 分发界面事件；错误已在各组件内提示用户并记录日志。
    pub async fn handle(&self, event: UiEvent) {
        match event {
            UiEvent::Search(filters) => {
                let _ = self.search(&filters).await;
            }
            UiEvent::ListItemClicked(place_id) => {
                let _ = self.renderer.open_details(&place_id).await;
            }
            UiEvent::MarkerClicked(marker) => {
                let place_id = self.session.with(|session| session.place_for_marker(marker));
                match place_id {
                    Some(place_id) => {
                        let _ = self.renderer.open_details(&place_id).await;
                    }
                    None => debug!(target: "finder.client", marker = marker.0, "marker_unknown"),
                }
            }
            UiEvent::PopupClosed => self.renderer.close_details(),
            UiEvent::StatusCheckClicked(place_id) => {
                let _ = self.check_status(&place_id).await;
            }
            UiEvent::RouteClicked(place_id) => {
                let _ = self.renderer.show_route(&place_id).await;
            }
            UiEvent::FavoriteClicked(place_id) => {
                self.add_favorite(&place_id);
            }
            UiEvent::ShowFavorites => {
                self.show_favorites().await;
            }
            UiEvent::Sort(order) => self.sort(order),
            UiEvent::TogglePolling => {
                self.toggle_polling().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MarkerIcon;
    use crate::testing::{FakeBackend, RecordingSurface, place_at};
    use api_contract::STATUS_OK;

    fn client() -> (FinderClient, Arc<FakeBackend>, Arc<RecordingSurface>) {
        let backend = Arc::new(FakeBackend::default());
        let surface = Arc::new(RecordingSurface::default());
        let client = FinderClient::new(backend.clone(), surface.clone(), &ClientConfig::default());
        client.set_user_location(LatLng::new(37.50, 127.00));
        (client, backend, surface)
    }

    fn filters() -> SearchFilters {
        SearchFilters {
            radius_m: Some(2000),
            ..SearchFilters::default()
        }
    }

    #[tokio::test]
    async fn marker_click_opens_details_popup() {
        let (client, backend, surface) = client();
        backend.set_nearby(STATUS_OK, vec![place_at("a", "Alpha", 37.51, 127.0)]);
        client.handle(UiEvent::Search(filters())).await;

        let marker = client
            .session()
            .with(|session| session.marker_for("a"))
            .expect("marker");
        client.handle(UiEvent::MarkerClicked(marker)).await;

        assert_eq!(surface.popups().len(), 1);
        assert_eq!(surface.popups()[0].place_id, "a");
    }

    #[tokio::test]
    async fn sort_by_distance_reorders_list_only() {
        let (client, backend, surface) = client();
        backend.set_nearby(
            STATUS_OK,
            vec![
                place_at("far", "Far", 37.60, 127.0),
                place_at("near", "Near", 37.501, 127.0),
            ],
        );
        client.handle(UiEvent::Search(filters())).await;
        let markers_before = surface.live_marker_places();

        client.handle(UiEvent::Sort(SortOrder::Distance)).await;

        assert_eq!(surface.list_ids(), vec!["near", "far"]);
        assert_eq!(surface.live_marker_places(), markers_before);
    }

    #[tokio::test]
    async fn favorites_render_through_renderer() {
        let (client, backend, surface) = client();
        backend.set_nearby(
            STATUS_OK,
            vec![
                place_at("a", "Alpha", 37.51, 127.0),
                place_at("b", "Beta", 37.52, 127.0),
            ],
        );
        client.handle(UiEvent::Search(filters())).await;
        client.handle(UiEvent::FavoriteClicked("b".to_string())).await;
        client.handle(UiEvent::FavoriteClicked("b".to_string())).await;

        client.handle(UiEvent::ShowFavorites).await;

        assert_eq!(surface.list_ids(), vec!["b"]);
        assert_eq!(surface.live_marker_places(), vec!["b"]);
        assert_eq!(
            surface.notices(),
            vec![
                FAVORITE_ADDED_MESSAGE.to_string(),
                FAVORITE_EXISTS_MESSAGE.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn toggling_polling_twice_restores_icons() {
        let (client, backend, surface) = client();
        backend.set_nearby(STATUS_OK, vec![place_at("a", "Alpha", 37.51, 127.0)]);
        backend.set_open("a", true);
        client.handle(UiEvent::Search(filters())).await;
        let marker = client
            .session()
            .with(|session| session.marker_for("a"))
            .expect("marker");

        client.handle(UiEvent::TogglePolling).await;
        assert_eq!(client.polling_state().await, PollerState::Active);
        assert_eq!(surface.icon(marker), Some(MarkerIcon::Open));

        client.handle(UiEvent::TogglePolling).await;
        assert_eq!(client.polling_state().await, PollerState::Inactive);
        assert_eq!(surface.icon(marker), Some(MarkerIcon::Default));
    }

    #[tokio::test]
    async fn manual_status_check_uses_rendered_name() {
        let (client, backend, surface) = client();
        backend.set_nearby(STATUS_OK, vec![place_at("a", "Alpha", 37.51, 127.0)]);
        backend.set_open("a", false);
        client.handle(UiEvent::Search(filters())).await;

        client
            .handle(UiEvent::StatusCheckClicked("a".to_string()))
            .await;

        assert_eq!(backend.recorded_statuses(), vec![("a".to_string(), false)]);
        assert_eq!(
            surface.notices(),
            vec!["Alpha is currently closed.".to_string()]
        );
    }
}
