//! 公共活动内存实现

use crate::error::StorageError;
use crate::traits::EventStore;
use domain::PublicEvent;
use std::sync::RwLock;

/// 公共活动内存存储
pub struct InMemoryEventStore {
    events: RwLock<Vec<PublicEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EventStore for InMemoryEventStore {
    async fn create_event(&self, record: PublicEvent) -> Result<PublicEvent, StorageError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if events.iter().any(|item| item.event_id == record.event_id) {
            return Err(StorageError::new("event already exists"));
        }
        events.push(record.clone());
        Ok(record)
    }

    async fn list_events(&self) -> Result<Vec<PublicEvent>, StorageError> {
        let events = self
            .events
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(events.clone())
    }
}
