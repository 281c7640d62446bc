use std::collections::HashMap;

use tokio::sync::RwLock;

use concierge_core::{Record, RecordId};

use super::{RecordStore, StoreError};

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, Record>>,
}

impl InMemoryRecordStore {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&id.0).cloned())
    }

    async fn put(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(record.id.0.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        Ok(records.remove(&id.0).is_some())
    }
}
