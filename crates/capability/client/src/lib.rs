//! 设施列表同步与营业状态轮询流水线。
//!
//! 流水线只依赖两个抽象：
//! - `FacilityBackend`：后端 REST 接口（`HttpBackend` 为 reqwest 实现）
//! - `RenderSurface`：地图与列表的绘制命令、用户提示
//!
//! 数据流：`SearchOrchestrator` → 附近搜索 → `FacilityRenderer`
//! （距离计算 + 照片解析）→ 列表与标记。`StatusPoller` 独立地按固定间隔
//! 重新查询当前渲染设施的营业状态，只更新标记颜色。
//!
//! 会话状态（用户位置、标记映射、当前弹窗、收藏）集中在 `SharedSession`，
//! 各组件持有同一个句柄。

pub mod app;
pub mod backend;
pub mod distance;
pub mod error;
pub mod favorites;
pub mod gather;
pub mod photo;
pub mod poller;
pub mod renderer;
pub mod search;
pub mod session;
pub mod sort;
pub mod status;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{FinderClient, UiEvent};
pub use backend::{FacilityBackend, HttpBackend};
pub use distance::{distance_km, haversine_km};
pub use error::{ClientError, StatusCheckError};
pub use gather::{Settled, gather_settled};
pub use photo::PhotoResolver;
pub use poller::{PollHandle, PollerState, StatusPoller};
pub use renderer::{FacilityRenderer, RenderOutcome};
pub use search::{SearchFilters, SearchOrchestrator, SearchOutcome};
pub use session::{RenderedFacility, Session, SharedSession};
pub use sort::SortOrder;
pub use status::{CheckMode, StatusCheckOutcome, StatusChecker};
pub use surface::{
    CongestionLine, ListItem, MarkerHandle, MarkerIcon, MarkerSpec, PopupContent, RenderSurface,
    RouteSummary,
};
