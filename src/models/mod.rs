/// Request and response bodies of the REST endpoints.
pub mod email;

/// # Health Status Response
///
/// Operational status of the service with version and timestamp.
pub mod health;

/// Verification taxonomy: statuses, per-address results and stored records.
pub mod verification;

pub use health::HealthResponse;
pub use verification::{
    EmailStatus, PendingRecord, RecordId, RecordPatch, RecordQuery, StoredRecord,
    VerificationResult,
};
