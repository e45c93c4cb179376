//! 传感器数据内存实现

use crate::error::StorageError;
use crate::traits::SensorStore;
use domain::SensorReading;
use std::sync::RwLock;

/// 传感器数据内存存储
pub struct InMemorySensorStore {
    readings: RwLock<Vec<SensorReading>>,
}

impl InMemorySensorStore {
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemorySensorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SensorStore for InMemorySensorStore {
    async fn push_reading(&self, reading: SensorReading) -> Result<(), StorageError> {
        let mut readings = self
            .readings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        readings.push(reading);
        Ok(())
    }

    async fn recent_readings(&self, limit: usize) -> Result<Vec<SensorReading>, StorageError> {
        let readings = self
            .readings
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let start = readings.len().saturating_sub(limit);
        Ok(readings[start..].to_vec())
    }
}
