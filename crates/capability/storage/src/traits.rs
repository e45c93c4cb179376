//! 存储接口 Trait 定义
//!
//! 定义所有键值资源存储的异步接口：
//! - FacilityStore：附近搜索注册的公共设施
//! - OpenStatusStore：营业状态观测日志（只追加）
//! - CongestionStore：拥挤度采样
//! - FeedbackStore：用户反馈
//! - EventStore：公共活动
//! - SensorStore：传感器上报数据
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{
    CongestionSample, FeedbackEntry, OpenStatusObservation, PublicEvent, RegisteredFacility,
    SensorReading,
};
use std::collections::HashMap;

/// 设施注册存储接口
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// 写入或覆盖设施
    async fn upsert_facility(&self, record: RegisteredFacility) -> Result<(), StorageError>;

    /// 设施是否已注册
    async fn facility_exists(&self, place_id: &str) -> Result<bool, StorageError>;
}

/// 营业状态日志存储接口
#[async_trait]
pub trait OpenStatusStore: Send + Sync {
    /// 追加一条观测记录
    async fn append_status(&self, record: OpenStatusObservation) -> Result<(), StorageError>;

    /// 列出全部观测记录（按时间升序）
    async fn list_status(&self) -> Result<Vec<OpenStatusObservation>, StorageError>;
}

/// 拥挤度存储接口
#[async_trait]
pub trait CongestionStore: Send + Sync {
    async fn append_sample(
        &self,
        place_id: &str,
        sample: CongestionSample,
    ) -> Result<(), StorageError>;

    async fn list_samples(&self, place_id: &str) -> Result<Vec<CongestionSample>, StorageError>;

    /// 按设施分组列出全部采样
    async fn list_all_samples(&self)
    -> Result<HashMap<String, Vec<CongestionSample>>, StorageError>;
}

/// 反馈存储接口
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn append_feedback(&self, place_id: &str, entry: FeedbackEntry)
    -> Result<(), StorageError>;

    async fn list_feedback(&self, place_id: &str) -> Result<Vec<FeedbackEntry>, StorageError>;
}

/// 公共活动存储接口
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, record: PublicEvent) -> Result<PublicEvent, StorageError>;

    async fn list_events(&self) -> Result<Vec<PublicEvent>, StorageError>;
}

/// 传感器数据存储接口
#[async_trait]
pub trait SensorStore: Send + Sync {
    async fn push_reading(&self, reading: SensorReading) -> Result<(), StorageError>;

    /// 最近 `limit` 条，按写入顺序
    async fn recent_readings(&self, limit: usize) -> Result<Vec<SensorReading>, StorageError>;
}
