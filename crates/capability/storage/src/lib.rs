//! # Finder Storage 模块
//!
//! 本模块提供统一的键值存储抽象层，支持内存与 Redis 两种后端。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：定义所有资源存储的异步 Trait 接口
//! 2. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 3. **验证辅助层** (`validation.rs`)：设施 ID 校验（ID 会拼进存储键）
//! 4. **实现层**：
//!    - `in_memory/`：内存存储实现（测试和本地演示）
//!    - `redis`：Redis 存储实现（生产环境使用）
//!
//! ## 数据约束
//!
//! - 营业状态日志只追加，不提供更新或删除接口
//! - 营业状态写入前由调用方确认设施已注册（`FacilityStore::facility_exists`）
//! - 列表按写入顺序返回；营业状态日志按时间升序返回
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use finder_storage::{InMemoryOpenStatusStore, OpenStatusStore};
//! use domain::OpenStatusObservation;
//!
//! let store = InMemoryOpenStatusStore::new();
//! store
//!     .append_status(OpenStatusObservation {
//!         place_id: "p-1".to_string(),
//!         facility_name: Some("Library".to_string()),
//!         is_open: true,
//!         ts_ms: 1_700_000_000_000,
//!     })
//!     .await?;
//! let log = store.list_status().await?;
//! ```

pub mod error;
pub mod in_memory;
pub mod redis;
pub mod traits;
pub mod validation;

pub use error::*;
pub use redis::RedisStore;
pub use traits::*;
pub use validation::*;

pub use in_memory::{
    InMemoryCongestionStore, InMemoryEventStore, InMemoryFacilityStore, InMemoryFeedbackStore,
    InMemoryOpenStatusStore, InMemorySensorStore,
};
