//! 营业状态日志内存实现

use crate::error::StorageError;
use crate::traits::OpenStatusStore;
use crate::validation::ensure_place_id;
use domain::OpenStatusObservation;
use std::sync::RwLock;

/// 营业状态日志内存存储（只追加）
pub struct InMemoryOpenStatusStore {
    records: RwLock<Vec<OpenStatusObservation>>,
}

impl InMemoryOpenStatusStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryOpenStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl OpenStatusStore for InMemoryOpenStatusStore {
    async fn append_status(&self, record: OpenStatusObservation) -> Result<(), StorageError> {
        ensure_place_id(&record.place_id)?;
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        records.push(record);
        Ok(())
    }

    async fn list_status(&self) -> Result<Vec<OpenStatusObservation>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items = records.clone();
        // 稳定排序：同一时间戳保持写入顺序
        items.sort_by_key(|item| item.ts_ms);
        Ok(items)
    }
}
