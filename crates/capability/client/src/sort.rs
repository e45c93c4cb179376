//! 列表排序（仅由用户显式触发）。

use crate::session::RenderedFacility;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// 名称，不区分大小写。
    Name,
    /// 距离升序，未知距离排在最后。
    Distance,
}

/// 稳定排序。
pub fn sort_facilities(facilities: &mut [RenderedFacility], order: SortOrder) {
    match order {
        SortOrder::Name => facilities.sort_by_cached_key(|facility| facility.item.name.to_lowercase()),
        SortOrder::Distance => facilities.sort_by(|left, right| {
            compare_distance(left.item.distance_km, right.item.distance_km)
        }),
    }
}

fn compare_distance(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
