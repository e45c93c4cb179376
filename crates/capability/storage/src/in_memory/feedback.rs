//! 反馈内存实现

use crate::error::StorageError;
use crate::traits::FeedbackStore;
use crate::validation::ensure_place_id;
use domain::FeedbackEntry;
use std::collections::HashMap;
use std::sync::RwLock;

/// 反馈内存存储
pub struct InMemoryFeedbackStore {
    entries: RwLock<HashMap<String, Vec<FeedbackEntry>>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn append_feedback(
        &self,
        place_id: &str,
        entry: FeedbackEntry,
    ) -> Result<(), StorageError> {
        ensure_place_id(place_id)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        entries.entry(place_id.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn list_feedback(&self, place_id: &str) -> Result<Vec<FeedbackEntry>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(entries.get(place_id).cloned().unwrap_or_default())
    }
}
