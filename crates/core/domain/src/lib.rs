pub mod data;

pub use data::{
    CongestionSample, FeedbackEntry, LatLng, OpenStatusObservation, PublicEvent,
    RegisteredFacility, SensorReading,
};

use std::time::{SystemTime, UNIX_EPOCH};

/// 当前时间（Unix 毫秒）。
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}
