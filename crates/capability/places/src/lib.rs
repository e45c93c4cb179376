//! 上游地点服务客户端。
//!
//! - `PlacesProvider`：附近搜索、设施详情、照片 URL、路线计算的统一接口
//! - `GooglePlacesClient`：基于 reqwest 的 HTTP 实现
//!
//! 上游以 `status` 字段表达业务结果：`OK` 为成功，`ZERO_RESULTS` 对附近搜索
//! 是正常的空结果，其余状态统一映射为 `PlacesError::Status`。

pub mod error;
pub mod google;
pub mod provider;

pub use error::PlacesError;
pub use google::{GooglePlacesClient, PlacesSettings};
pub use provider::{DEFAULT_TRAVEL_MODE, NearbySearchParams, PlacesProvider};
