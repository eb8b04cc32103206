use super::RecordStore;
use crate::error::StoreError;
use crate::models::{
    EmailStatus, PendingRecord, RecordId, RecordPatch, RecordQuery, StoredRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, doc, oid::ObjectId};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Document layout of the `email_verifications` collection.
#[derive(Debug, Serialize, Deserialize)]
struct VerificationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    email: String,
    status: EmailStatus,
    reason: String,
    syntax_valid: Option<bool>,
    domain_exists: Option<bool>,
    mx_records_exist: Option<bool>,
    created_at: bson::DateTime,
    verified_at: Option<bson::DateTime>,
}

impl VerificationDocument {
    fn from_pending(pending: PendingRecord, created_at: bson::DateTime) -> Self {
        Self {
            id: None,
            user_id: pending.user_id,
            email: pending.email,
            status: pending.status,
            reason: pending.reason,
            syntax_valid: pending.syntax_valid,
            domain_exists: pending.domain_exists,
            mx_records_exist: pending.mx_records_exist,
            created_at,
            verified_at: None,
        }
    }

    fn into_record(self) -> Result<StoredRecord, StoreError> {
        let id = self.id.map(|oid| oid.to_hex()).unwrap_or_default();
        let created_at = to_chrono(self.created_at).ok_or_else(|| StoreError::Corrupt {
            id: id.clone(),
            reason: "created_at out of range".to_string(),
        })?;
        let verified_at = match self.verified_at {
            Some(at) => Some(to_chrono(at).ok_or_else(|| StoreError::Corrupt {
                id: id.clone(),
                reason: "verified_at out of range".to_string(),
            })?),
            None => None,
        };

        Ok(StoredRecord {
            id,
            user_id: self.user_id,
            email: self.email,
            status: self.status,
            reason: self.reason,
            syntax_valid: self.syntax_valid,
            domain_exists: self.domain_exists,
            mx_records_exist: self.mx_records_exist,
            created_at,
            verified_at,
        })
    }
}

fn to_bson(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn to_chrono(at: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(at.timestamp_millis())
}

#[derive(Clone)]
pub struct MongoRecordStore {
    collection: Collection<VerificationDocument>,
}

impl MongoRecordStore {
    pub fn new(client: &Client, db_name: &str, collection_name: &str) -> Self {
        Self {
            collection: client.database(db_name).collection(collection_name),
        }
    }

    /// Index backing the per-user, newest-first result query.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn create_many(&self, records: Vec<PendingRecord>) -> Result<Vec<RecordId>, StoreError> {
        let expected = records.len();
        let created_at = to_bson(Utc::now());
        let docs: Vec<VerificationDocument> = records
            .into_iter()
            .map(|pending| VerificationDocument::from_pending(pending, created_at))
            .collect();

        let inserted = self.collection.insert_many(&docs).await?;
        if inserted.inserted_ids.len() != expected {
            return Err(StoreError::IdCountMismatch {
                expected,
                actual: inserted.inserted_ids.len(),
            });
        }

        // inserted_ids is keyed by input position
        (0..expected)
            .map(|i| {
                inserted
                    .inserted_ids
                    .get(&i)
                    .and_then(Bson::as_object_id)
                    .map(|oid| oid.to_hex())
                    .ok_or(StoreError::MissingId(i))
            })
            .collect()
    }

    async fn update_by_id(&self, id: &str, patch: RecordPatch) -> Result<(), StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        let update = doc! {
            "$set": {
                "status": patch.status.as_str(),
                "reason": patch.reason.as_str(),
                "syntax_valid": patch.syntax_valid,
                "domain_exists": patch.domain_exists,
                "mx_records_exist": patch.mx_records_exist,
                "verified_at": to_bson(patch.verified_at),
            }
        };

        let result = self.collection.update_one(doc! { "_id": oid }, update).await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(id, status = %patch.status, "record updated");
        Ok(())
    }

    async fn query(&self, query: RecordQuery) -> Result<Vec<StoredRecord>, StoreError> {
        let mut filter = doc! { "user_id": query.user_id.as_str() };
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        let docs: Vec<VerificationDocument> = cursor.try_collect().await?;

        docs.into_iter()
            .map(VerificationDocument::into_record)
            .collect()
    }
}
