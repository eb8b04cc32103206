use crate::error::StoreError;
use crate::models::{PendingRecord, RecordId, RecordPatch, RecordQuery, StoredRecord};
use async_trait::async_trait;

/// In-process store used by tests and `STORE_BACKEND=memory`.
pub mod memory;

/// MongoDB-backed store for the `email_verifications` collection.
pub mod mongo;

pub use memory::MemoryRecordStore;
pub use mongo::MongoRecordStore;

/// Keyed record storage for verification batches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts all records and returns one identifier per input position,
    /// in input order.
    async fn create_many(&self, records: Vec<PendingRecord>) -> Result<Vec<RecordId>, StoreError>;

    /// Applies `patch` to the record with identifier `id`.
    async fn update_by_id(&self, id: &str, patch: RecordPatch) -> Result<(), StoreError>;

    /// Records owned by `query.user_id`, newest first.
    async fn query(&self, query: RecordQuery) -> Result<Vec<StoredRecord>, StoreError>;
}
