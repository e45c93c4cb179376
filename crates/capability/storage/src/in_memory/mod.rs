//! 内存存储实现模块
//!
//! 用于本地演示和测试（FINDER_STORAGE=memory）。
//!
//! 包含以下实现：
//! - FacilityStore: InMemoryFacilityStore
//! - OpenStatusStore: InMemoryOpenStatusStore
//! - CongestionStore: InMemoryCongestionStore
//! - FeedbackStore: InMemoryFeedbackStore
//! - EventStore: InMemoryEventStore
//! - SensorStore: InMemorySensorStore

pub mod congestion;
pub mod event;
pub mod facility;
pub mod feedback;
pub mod open_status;
pub mod sensor;

pub use congestion::*;
pub use event::*;
pub use facility::*;
pub use feedback::*;
pub use open_status::*;
pub use sensor::*;
