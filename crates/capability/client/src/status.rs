//! 单设施营业状态检查。
//!
//! 流程固定为：（交互模式）确认 → 查询详情 → 更新标记颜色 → 写入状态记录 →
//! （交互模式）提示结果。写入失败只提示保存失败，已更新的标记颜色不回滚。

use crate::backend::FacilityBackend;
use crate::error::StatusCheckError;
use crate::session::SharedSession;
use crate::surface::{MarkerIcon, RenderSurface};
use finder_telemetry::record_status_check_failure;
use std::sync::Arc;
use tracing::{info, warn};

/// 检查模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// 手动检查：先确认，结束后提示结果。
    Interactive,
    /// 轮询使用：不与用户交互。
    Silent,
}

/// 检查结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheckOutcome {
    pub place_id: String,
    pub is_open: bool,
    /// 标记是否已重新着色（没有标记时为 false）。
    pub recolored: bool,
    /// 状态记录是否写入成功。
    pub persisted: bool,
}

pub struct StatusChecker {
    backend: Arc<dyn FacilityBackend>,
    surface: Arc<dyn RenderSurface>,
    session: SharedSession,
}

impl StatusChecker {
    pub fn new(
        backend: Arc<dyn FacilityBackend>,
        surface: Arc<dyn RenderSurface>,
        session: SharedSession,
    ) -> Self {
        Self {
            backend,
            surface,
            session,
        }
    }

    pub async fn check_open_status(
        &self,
        place_id: &str,
        facility_name: &str,
        mode: CheckMode,
    ) -> Result<StatusCheckOutcome, StatusCheckError> {
        let interactive = mode == CheckMode::Interactive;
        if interactive
            && !self
                .surface
                .confirm(&format!("Check whether {} is open now?", facility_name))
        {
            return Err(StatusCheckError::Declined);
        }

        let details = match self.backend.facility_details(place_id).await {
            Ok(details) => details,
            Err(err) => {
                record_status_check_failure();
                warn!(
                    target: "finder.client",
                    place_id,
                    name = facility_name,
                    error = %err,
                    "status_lookup_failed"
                );
                if interactive {
                    self.surface
                        .notify(&format!("Could not check the status of {}.", facility_name));
                }
                return Err(StatusCheckError::Lookup(err));
            }
        };
        let is_open = details.is_open_now();

        let recolored = self.session.with(|session| match session.marker_for(place_id) {
            Some(marker) => {
                self.surface
                    .set_marker_icon(marker, MarkerIcon::for_status(is_open));
                true
            }
            None => false,
        });
        if !recolored {
            warn!(target: "finder.client", place_id, name = facility_name, "status_marker_missing");
        }

        let persisted = match self
            .backend
            .record_status(place_id, facility_name, is_open)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    target: "finder.client",
                    place_id,
                    name = facility_name,
                    error = %err,
                    "status_record_save_failed"
                );
                false
            }
        };

        info!(target: "finder.client", place_id, is_open, persisted, "status_checked");

        if interactive {
            let state = if is_open { "open" } else { "closed" };
            self.surface
                .notify(&format!("{} is currently {}.", facility_name, state));
            if !persisted {
                self.surface.notify(&format!(
                    "Failed to save the status record for {}.",
                    facility_name
                ));
            }
        }

        Ok(StatusCheckOutcome {
            place_id: place_id.to_string(),
            is_open,
            recolored,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, RecordingSurface};
    use crate::surface::{MarkerHandle, ListItem};
    use crate::session::RenderedFacility;
    use api_contract::PlaceSummaryDto;
    use domain::LatLng;

    fn checker_with_marker() -> (
        StatusChecker,
        Arc<FakeBackend>,
        Arc<RecordingSurface>,
        MarkerHandle,
    ) {
        let backend = Arc::new(FakeBackend::default());
        let surface = Arc::new(RecordingSurface::default());
        let session = SharedSession::new();
        let marker = surface.add_marker(&crate::surface::MarkerSpec {
            place_id: "a".to_string(),
            title: "Alpha".to_string(),
            position: LatLng::new(37.0, 127.0),
        });
        session.with(|session| {
            session.insert_rendered(
                RenderedFacility {
                    source: PlaceSummaryDto::default(),
                    item: ListItem {
                        place_id: "a".to_string(),
                        name: "Alpha".to_string(),
                        vicinity: None,
                        location: LatLng::new(37.0, 127.0),
                        distance_km: None,
                        photo_url: String::new(),
                        rating: None,
                        open_now: None,
                        website: None,
                    },
                },
                marker,
            )
        });
        let checker = StatusChecker::new(backend.clone(), surface.clone(), session);
        (checker, backend, surface, marker)
    }

    #[tokio::test]
    async fn interactive_check_confirms_recolors_and_reports() {
        let (checker, backend, surface, marker) = checker_with_marker();
        backend.set_open("a", true);

        let outcome = checker
            .check_open_status("a", "Alpha", CheckMode::Interactive)
            .await
            .expect("check");

        assert!(outcome.is_open && outcome.recolored && outcome.persisted);
        assert_eq!(surface.icon(marker), Some(MarkerIcon::Open));
        assert_eq!(surface.confirm_calls(), 1);
        assert_eq!(surface.notices(), vec!["Alpha is currently open.".to_string()]);
        assert_eq!(backend.recorded_statuses(), vec![("a".to_string(), true)]);
    }

    #[tokio::test]
    async fn declined_confirmation_makes_no_calls() {
        let (checker, backend, surface, _marker) = checker_with_marker();
        surface.answer_confirm(false);

        let result = checker
            .check_open_status("a", "Alpha", CheckMode::Interactive)
            .await;

        assert_eq!(result, Err(StatusCheckError::Declined));
        assert_eq!(backend.details_calls("a"), 0);
    }

    #[tokio::test]
    async fn silent_check_never_prompts() {
        let (checker, backend, surface, marker) = checker_with_marker();
        backend.set_open("a", false);

        checker
            .check_open_status("a", "Alpha", CheckMode::Silent)
            .await
            .expect("check");

        assert_eq!(surface.confirm_calls(), 0);
        assert!(surface.notices().is_empty());
        assert_eq!(surface.icon(marker), Some(MarkerIcon::Closed));
    }

    #[tokio::test]
    async fn save_failure_is_reported_without_rollback() {
        let (checker, backend, surface, marker) = checker_with_marker();
        backend.set_open("a", true);
        backend.fail_record_status();

        let outcome = checker
            .check_open_status("a", "Alpha", CheckMode::Interactive)
            .await
            .expect("check");

        assert!(!outcome.persisted);
        assert_eq!(surface.icon(marker), Some(MarkerIcon::Open));
        assert_eq!(
            surface.notices().last().map(String::as_str),
            Some("Failed to save the status record for Alpha.")
        );
    }

    #[tokio::test]
    async fn lookup_failure_is_surfaced_interactively() {
        let (checker, backend, surface, marker) = checker_with_marker();
        backend.fail_details("a");

        let result = checker
            .check_open_status("a", "Alpha", CheckMode::Interactive)
            .await;

        assert!(matches!(result, Err(StatusCheckError::Lookup(_))));
        assert_eq!(surface.icon(marker), Some(MarkerIcon::Default));
        assert_eq!(surface.notices().len(), 1);
        assert!(backend.recorded_statuses().is_empty());
    }

    #[tokio::test]
    async fn missing_marker_still_persists() {
        let backend = Arc::new(FakeBackend::default());
        let surface = Arc::new(RecordingSurface::default());
        let checker = StatusChecker::new(backend.clone(), surface.clone(), SharedSession::new());
        backend.set_open("z", true);

        let outcome = checker
            .check_open_status("z", "Zeta", CheckMode::Silent)
            .await
            .expect("check");

        assert!(!outcome.recolored);
        assert!(outcome.persisted);
    }
}
