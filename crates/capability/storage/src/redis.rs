//! Redis 键值存储实现
//!
//! 所有载荷以 JSON 字符串保存：
//! - `finder:facility:{id}`：设施注册（string）
//! - `finder:open_status:{id}` + `finder:open_status:index`：营业状态日志（list + set）
//! - `finder:congestion:{id}` + `finder:congestion:index`：拥挤度采样（list + set）
//! - `finder:feedback:{id}`：反馈（list）
//! - `finder:events`：公共活动（hash，field 为 event_id）
//! - `finder:sensor_data`：传感器数据（list）

use crate::error::StorageError;
use crate::traits::{
    CongestionStore, EventStore, FacilityStore, FeedbackStore, OpenStatusStore, SensorStore,
};
use crate::validation::ensure_place_id;
use domain::{
    CongestionSample, FeedbackEntry, OpenStatusObservation, PublicEvent,
    RegisteredFacility, SensorReading,
};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::collections::HashMap;

const OPEN_STATUS_INDEX: &str = "finder:open_status:index";
const CONGESTION_INDEX: &str = "finder:congestion:index";
const EVENTS_KEY: &str = "finder:events";
const SENSOR_KEY: &str = "finder:sensor_data";

#[derive(serde::Serialize, serde::Deserialize)]
struct FacilityPayload {
    name: String,
    types: Vec<String>,
    lat: f64,
    lng: f64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct OpenStatusPayload {
    facility_name: Option<String>,
    is_open: bool,
    ts_ms: i64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CongestionPayload {
    congestion_level: f64,
    ts_ms: i64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct FeedbackPayload {
    rating: u8,
    review: String,
    ts_ms: i64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct EventPayload {
    event_id: String,
    title: String,
    description: String,
    date: String,
    location: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SensorPayload {
    payload: String,
    received_at_ms: i64,
}

fn facility_key(place_id: &str) -> String {
    format!("finder:facility:{}", place_id)
}

fn open_status_key(place_id: &str) -> String {
    format!("finder:open_status:{}", place_id)
}

fn congestion_key(place_id: &str) -> String {
    format!("finder:congestion:{}", place_id)
}

fn feedback_key(place_id: &str) -> String {
    format!("finder:feedback:{}", place_id)
}

/// Redis 键值存储（实现全部存储接口）。
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn connect(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self::new(client))
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_tokio_connection().await?)
    }
}

#[async_trait::async_trait]
impl FacilityStore for RedisStore {
    async fn upsert_facility(&self, record: RegisteredFacility) -> Result<(), StorageError> {
        ensure_place_id(&record.place_id)?;
        let payload = FacilityPayload {
            name: record.name,
            types: record.types,
            lat: record.location.lat,
            lng: record.location.lng,
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        connection
            .set::<_, _, ()>(facility_key(&record.place_id), data)
            .await?;
        Ok(())
    }

    async fn facility_exists(&self, place_id: &str) -> Result<bool, StorageError> {
        let mut connection = self.connection().await?;
        let exists: bool = connection.exists(facility_key(place_id)).await?;
        Ok(exists)
    }
}

#[async_trait::async_trait]
impl OpenStatusStore for RedisStore {
    async fn append_status(&self, record: OpenStatusObservation) -> Result<(), StorageError> {
        ensure_place_id(&record.place_id)?;
        let payload = OpenStatusPayload {
            facility_name: record.facility_name,
            is_open: record.is_open,
            ts_ms: record.ts_ms,
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        redis::pipe()
            .atomic()
            .rpush(open_status_key(&record.place_id), data)
            .ignore()
            .sadd(OPEN_STATUS_INDEX, &record.place_id)
            .ignore()
            .query_async::<_, ()>(&mut connection)
            .await?;
        Ok(())
    }

    async fn list_status(&self) -> Result<Vec<OpenStatusObservation>, StorageError> {
        let mut connection = self.connection().await?;
        let place_ids: Vec<String> = connection.smembers(OPEN_STATUS_INDEX).await?;
        let mut items = Vec::new();
        for place_id in place_ids {
            let values: Vec<String> = connection.lrange(open_status_key(&place_id), 0, -1).await?;
            for value in values {
                let payload: OpenStatusPayload = match serde_json::from_str(&value) {
                    Ok(payload) => payload,
                    Err(_) => continue,
                };
                items.push(OpenStatusObservation {
                    place_id: place_id.clone(),
                    facility_name: payload.facility_name,
                    is_open: payload.is_open,
                    ts_ms: payload.ts_ms,
                });
            }
        }
        items.sort_by_key(|item| item.ts_ms);
        Ok(items)
    }
}

#[async_trait::async_trait]
impl CongestionStore for RedisStore {
    async fn append_sample(
        &self,
        place_id: &str,
        sample: CongestionSample,
    ) -> Result<(), StorageError> {
        ensure_place_id(place_id)?;
        let payload = CongestionPayload {
            congestion_level: sample.congestion_level,
            ts_ms: sample.ts_ms,
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        redis::pipe()
            .atomic()
            .rpush(congestion_key(place_id), data)
            .ignore()
            .sadd(CONGESTION_INDEX, place_id)
            .ignore()
            .query_async::<_, ()>(&mut connection)
            .await?;
        Ok(())
    }

    async fn list_samples(&self, place_id: &str) -> Result<Vec<CongestionSample>, StorageError> {
        let mut connection = self.connection().await?;
        let values: Vec<String> = connection.lrange(congestion_key(place_id), 0, -1).await?;
        Ok(decode_samples(values))
    }

    async fn list_all_samples(
        &self,
    ) -> Result<HashMap<String, Vec<CongestionSample>>, StorageError> {
        let mut connection = self.connection().await?;
        let place_ids: Vec<String> = connection.smembers(CONGESTION_INDEX).await?;
        let mut result = HashMap::new();
        for place_id in place_ids {
            let values: Vec<String> = connection.lrange(congestion_key(&place_id), 0, -1).await?;
            result.insert(place_id, decode_samples(values));
        }
        Ok(result)
    }
}

/// LRANGE 取最后 `limit` 条的起始下标，超出 isize 时取最早一条。
fn tail_start(limit: usize) -> isize {
    isize::try_from(limit).map_or(isize::MIN, |limit| -limit)
}

fn decode_samples(values: Vec<String>) -> Vec<CongestionSample> {
    values
        .iter()
        .filter_map(|value| serde_json::from_str::<CongestionPayload>(value).ok())
        .map(|payload| CongestionSample {
            congestion_level: payload.congestion_level,
            ts_ms: payload.ts_ms,
        })
        .collect()
}

#[async_trait::async_trait]
impl FeedbackStore for RedisStore {
    async fn append_feedback(
        &self,
        place_id: &str,
        entry: FeedbackEntry,
    ) -> Result<(), StorageError> {
        ensure_place_id(place_id)?;
        let payload = FeedbackPayload {
            rating: entry.rating,
            review: entry.review,
            ts_ms: entry.ts_ms,
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        connection
            .rpush::<_, _, ()>(feedback_key(place_id), data)
            .await?;
        Ok(())
    }

    async fn list_feedback(&self, place_id: &str) -> Result<Vec<FeedbackEntry>, StorageError> {
        let mut connection = self.connection().await?;
        let values: Vec<String> = connection.lrange(feedback_key(place_id), 0, -1).await?;
        Ok(values
            .iter()
            .filter_map(|value| serde_json::from_str::<FeedbackPayload>(value).ok())
            .map(|payload| FeedbackEntry {
                rating: payload.rating,
                review: payload.review,
                ts_ms: payload.ts_ms,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl EventStore for RedisStore {
    async fn create_event(&self, record: PublicEvent) -> Result<PublicEvent, StorageError> {
        let payload = EventPayload {
            event_id: record.event_id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            date: record.date.clone(),
            location: record.location.clone(),
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        let created: bool = connection
            .hset_nx(EVENTS_KEY, &record.event_id, data)
            .await?;
        if !created {
            return Err(StorageError::new("event already exists"));
        }
        Ok(record)
    }

    async fn list_events(&self) -> Result<Vec<PublicEvent>, StorageError> {
        let mut connection = self.connection().await?;
        let values: Vec<String> = connection.hvals(EVENTS_KEY).await?;
        Ok(values
            .iter()
            .filter_map(|value| serde_json::from_str::<EventPayload>(value).ok())
            .map(|payload| PublicEvent {
                event_id: payload.event_id,
                title: payload.title,
                description: payload.description,
                date: payload.date,
                location: payload.location,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl SensorStore for RedisStore {
    async fn push_reading(&self, reading: SensorReading) -> Result<(), StorageError> {
        let payload = SensorPayload {
            payload: reading.payload,
            received_at_ms: reading.received_at_ms,
        };
        let data = serde_json::to_string(&payload)?;
        let mut connection = self.connection().await?;
        connection.rpush::<_, _, ()>(SENSOR_KEY, data).await?;
        Ok(())
    }

    async fn recent_readings(&self, limit: usize) -> Result<Vec<SensorReading>, StorageError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut connection = self.connection().await?;
        let values: Vec<String> = connection
            .lrange(SENSOR_KEY, tail_start(limit), -1)
            .await?;
        Ok(values
            .iter()
            .filter_map(|value| serde_json::from_str::<SensorPayload>(value).ok())
            .map(|payload| SensorReading {
                payload: payload.payload,
                received_at_ms: payload.received_at_ms,
            })
            .collect())
    }
}
