use crate::auth::Principal;
use crate::error::{BatchError, StoreError};
use crate::handlers::validation::VerificationPipeline;
use crate::models::verification::normalize_email;
use crate::models::{PendingRecord, RecordPatch, VerificationResult};
use crate::store::RecordStore;
use chrono::Utc;
use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use std::sync::Arc;
use tracing::{error, info};

/// Runs a whole batch for one principal: persist pending records, verify
/// every address concurrently, then write each outcome back to its record.
///
/// Results are always returned in input order, one per input element,
/// duplicates included.
#[derive(Clone)]
pub struct BatchRunner {
    pipeline: Arc<VerificationPipeline>,
    store: Arc<dyn RecordStore>,
    concurrency: Option<usize>,
}

impl BatchRunner {
    pub fn new(pipeline: Arc<VerificationPipeline>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            pipeline,
            store,
            concurrency: None,
        }
    }

    /// Caps in-flight verifications at `limit`. `None` or `0` leaves the
    /// batch unbounded.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit.filter(|n| *n > 0);
        self
    }

    pub async fn run(
        &self,
        addresses: &[String],
        principal: &Principal,
    ) -> Result<Vec<VerificationResult>, BatchError> {
        if addresses.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let normalized: Vec<String> = addresses.iter().map(|a| normalize_email(a)).collect();
        let total = normalized.len();
        info!(user_id = %principal.user_id, total, "batch started");

        let pending = normalized
            .iter()
            .map(|email| PendingRecord::new(email, &principal.user_id))
            .collect();
        let ids = self.store.create_many(pending).await.map_err(|err| {
            error!(user_id = %principal.user_id, error = %err, "failed to create pending records");
            BatchError::Create(err)
        })?;
        if ids.len() != total {
            let err = StoreError::IdCountMismatch {
                expected: total,
                actual: ids.len(),
            };
            error!(user_id = %principal.user_id, error = %err, "store returned wrong id count");
            return Err(BatchError::Create(err));
        }

        let results = self.verify_all(&normalized).await;

        let updates = ids.iter().zip(&results).map(|(id, result)| async move {
            let patch = RecordPatch::from_result(result, Utc::now());
            self.store
                .update_by_id(id, patch)
                .await
                .map_err(|err| (id.as_str(), err))
        });
        let failures: Vec<(&str, StoreError)> = join_all(updates)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        let failed = failures.len();
        for (id, err) in &failures {
            error!(user_id = %principal.user_id, id, error = %err, "failed to store result");
        }
        if let Some((_, source)) = failures.into_iter().next() {
            return Err(BatchError::Update {
                failed,
                total,
                source,
            });
        }

        info!(user_id = %principal.user_id, total, "batch finished");
        Ok(results)
    }

    async fn verify_all(&self, addresses: &[String]) -> Vec<VerificationResult> {
        let pipeline = &self.pipeline;
        match self.concurrency {
            None => join_all(addresses.iter().map(|a| pipeline.verify(a))).await,
            Some(limit) => {
                // `buffered` yields in submission order
                let futures: Vec<_> = addresses.iter().map(|a| pipeline.verify(a)).collect();
                stream::iter(futures)
                    .buffered(limit)
                    .collect()
                    .await
            }
        }
    }
}
