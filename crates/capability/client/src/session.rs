//! 会话上下文：用户位置、当前渲染、标记映射、弹窗与收藏。
//!
//! 标记映射是“设施 ID → 标记”的唯一来源，每个 ID 至多一个标记。
//! 锁只在同步代码中持有，不跨 await。

use crate::surface::{ListItem, MarkerHandle};
use api_contract::PlaceSummaryDto;
use domain::LatLng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 当前渲染中的一个设施。
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFacility {
    pub source: PlaceSummaryDto,
    pub item: ListItem,
}

#[derive(Debug, Default)]
pub struct Session {
    user_location: Option<LatLng>,
    generation: u64,
    rendered: Vec<RenderedFacility>,
    markers: HashMap<String, MarkerHandle>,
    active_popup: Option<String>,
    favorites: Vec<PlaceSummaryDto>,
}

impl Session {
    pub fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    pub fn set_user_location(&mut self, location: LatLng) {
        self.user_location = Some(location);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 开始新一轮渲染：递增代数，清空列表与标记映射，返回需要移除的旧标记。
    pub fn begin_render(&mut self) -> (u64, Vec<MarkerHandle>) {
        self.generation += 1;
        self.rendered.clear();
        let removed = self.markers.drain().map(|(_, handle)| handle).collect();
        (self.generation, removed)
    }

    pub fn insert_rendered(&mut self, facility: RenderedFacility, marker: MarkerHandle) {
        self.markers.insert(facility.item.place_id.clone(), marker);
        self.rendered.push(facility);
    }

    pub fn rendered(&self) -> &[RenderedFacility] {
        &self.rendered
    }

    pub fn rendered_mut(&mut self) -> &mut Vec<RenderedFacility> {
        &mut self.rendered
    }

    pub fn facility(&self, place_id: &str) -> Option<&RenderedFacility> {
        self.rendered
            .iter()
            .find(|facility| facility.item.place_id == place_id)
    }

    /// 当前渲染的 (ID, 名称)，按列表顺序。
    pub fn rendered_ids(&self) -> Vec<(String, String)> {
        self.rendered
            .iter()
            .map(|facility| (facility.item.place_id.clone(), facility.item.name.clone()))
            .collect()
    }

    pub fn marker_for(&self, place_id: &str) -> Option<MarkerHandle> {
        self.markers.get(place_id).copied()
    }

    pub fn place_for_marker(&self, marker: MarkerHandle) -> Option<String> {
        self.markers
            .iter()
            .find(|(_, handle)| **handle == marker)
            .map(|(place_id, _)| place_id.clone())
    }

    pub fn marker_handles(&self) -> Vec<MarkerHandle> {
        self.markers.values().copied().collect()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn active_popup(&self) -> Option<&str> {
        self.active_popup.as_deref()
    }

    /// 记录新弹窗，返回被替换的旧弹窗。
    pub fn replace_popup(&mut self, place_id: &str) -> Option<String> {
        self.active_popup.replace(place_id.to_string())
    }

    pub fn clear_popup(&mut self) -> Option<String> {
        self.active_popup.take()
    }

    pub fn favorites(&self) -> &[PlaceSummaryDto] {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut Vec<PlaceSummaryDto> {
        &mut self.favorites
    }
}

/// 组件间共享的会话句柄。
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // 会话数据在 panic 后仍可用，忽略中毒标记
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.lock().user_location()
    }

    pub fn set_user_location(&self, location: LatLng) {
        self.lock().set_user_location(location);
    }
}
