use super::RecordStore;
use crate::error::StoreError;
use crate::models::{PendingRecord, RecordId, RecordPatch, RecordQuery, StoredRecord};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<StoredRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_many(&self, records: Vec<PendingRecord>) -> Result<Vec<RecordId>, StoreError> {
        let created_at = Utc::now();
        let mut stored = self.records.write().await;
        let ids = records
            .into_iter()
            .map(|pending| {
                let id = Uuid::new_v4().to_string();
                stored.push(StoredRecord::from_pending(id.clone(), pending, created_at));
                id
            })
            .collect();
        Ok(ids)
    }

    async fn update_by_id(&self, id: &str, patch: RecordPatch) -> Result<(), StoreError> {
        let mut stored = self.records.write().await;
        let record = stored
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply(patch);
        Ok(())
    }

    async fn query(&self, query: RecordQuery) -> Result<Vec<StoredRecord>, StoreError> {
        let stored = self.records.read().await;
        // Newest insertions first, so equal timestamps keep a stable order.
        let mut matching: Vec<StoredRecord> = stored
            .iter()
            .rev()
            .filter(|r| r.user_id == query.user_id)
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}
