//! 设施注册内存实现

use crate::error::StorageError;
use crate::traits::FacilityStore;
use crate::validation::ensure_place_id;
use domain::RegisteredFacility;
use std::collections::HashMap;
use std::sync::RwLock;

/// 设施注册内存存储
pub struct InMemoryFacilityStore {
    facilities: RwLock<HashMap<String, RegisteredFacility>>,
}

impl InMemoryFacilityStore {
    pub fn new() -> Self {
        Self {
            facilities: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryFacilityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FacilityStore for InMemoryFacilityStore {
    async fn upsert_facility(&self, record: RegisteredFacility) -> Result<(), StorageError> {
        ensure_place_id(&record.place_id)?;
        let mut facilities = self
            .facilities
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        facilities.insert(record.place_id.clone(), record);
        Ok(())
    }

    async fn facility_exists(&self, place_id: &str) -> Result<bool, StorageError> {
        let facilities = self
            .facilities
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(facilities.contains_key(place_id))
    }
}
