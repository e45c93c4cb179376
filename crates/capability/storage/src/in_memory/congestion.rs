//! 拥挤度采样内存实现

use crate::error::StorageError;
use crate::traits::CongestionStore;
use crate::validation::ensure_place_id;
use domain::CongestionSample;
use std::collections::HashMap;
use std::sync::RwLock;

/// 拥挤度内存存储
pub struct InMemoryCongestionStore {
    samples: RwLock<HashMap<String, Vec<CongestionSample>>>,
}

impl InMemoryCongestionStore {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCongestionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CongestionStore for InMemoryCongestionStore {
    async fn append_sample(
        &self,
        place_id: &str,
        sample: CongestionSample,
    ) -> Result<(), StorageError> {
        ensure_place_id(place_id)?;
        let mut samples = self
            .samples
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        samples.entry(place_id.to_string()).or_default().push(sample);
        Ok(())
    }

    async fn list_samples(&self, place_id: &str) -> Result<Vec<CongestionSample>, StorageError> {
        let samples = self
            .samples
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(samples.get(place_id).cloned().unwrap_or_default())
    }

    async fn list_all_samples(
        &self,
    ) -> Result<HashMap<String, Vec<CongestionSample>>, StorageError> {
        let samples = self
            .samples
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(samples.clone())
    }
}
