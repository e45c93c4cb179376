//! 绘制面抽象。
//!
//! 地图控件与 DOM 不在本 crate 内：流水线只发出绘制命令，并通过
//! `notify`/`confirm` 与用户交互。所有方法都是同步的，调用即生效。

use domain::LatLng;

/// 标记句柄，由绘制面分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// 标记外观。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerIcon {
    /// 新建标记的默认外观（无状态颜色）。
    #[default]
    Default,
    Open,
    Closed,
}

impl MarkerIcon {
    pub fn for_status(is_open: bool) -> Self {
        if is_open {
            MarkerIcon::Open
        } else {
            MarkerIcon::Closed
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        match self {
            MarkerIcon::Default => None,
            MarkerIcon::Open => Some("green"),
            MarkerIcon::Closed => Some("gray"),
        }
    }
}

/// 列表项。
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub place_id: String,
    pub name: String,
    pub vicinity: Option<String>,
    pub location: LatLng,
    /// 用户位置未知时为 None（显示为“未知”）。
    pub distance_km: Option<f64>,
    pub photo_url: String,
    pub rating: Option<f64>,
    pub open_now: Option<bool>,
    pub website: Option<String>,
}

/// 新建标记参数。
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub place_id: String,
    pub title: String,
    pub position: LatLng,
}

/// 弹窗中的拥挤度一行。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CongestionLine {
    Average(f64),
    NoData,
    /// 查询失败，弹窗仍然打开。
    Unavailable,
}

/// 详情弹窗内容。
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub place_id: String,
    pub name: String,
    pub photo_url: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub weekday_text: Vec<String>,
    pub rating: Option<f64>,
    pub website: Option<String>,
    pub congestion: CongestionLine,
}

/// 路线摘要。
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub place_id: String,
    pub distance_text: String,
    pub duration_text: String,
}

pub trait RenderSurface: Send + Sync {
    fn clear_list(&self);
    fn append_list_item(&self, item: &ListItem);
    fn show_empty_state(&self, message: &str);

    /// 新标记使用 `MarkerIcon::Default`。
    fn add_marker(&self, spec: &MarkerSpec) -> MarkerHandle;
    fn remove_marker(&self, handle: MarkerHandle);
    fn set_marker_icon(&self, handle: MarkerHandle, icon: MarkerIcon);

    fn open_popup(&self, content: &PopupContent);
    fn close_popup(&self);
    fn show_route(&self, route: &RouteSummary);

    fn notify(&self, message: &str);
    /// 返回 false 表示用户取消。
    fn confirm(&self, message: &str) -> bool;
}
