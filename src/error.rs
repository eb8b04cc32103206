//! Error types for the verification service.
//!
//! Checks themselves never fail: resolver problems are folded into the
//! verification outcome. Only configuration, authentication, input shape and
//! persistence failures surface as errors.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Startup configuration problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures while resolving a principal from a request.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token decoded but carries no usable subject.
    #[error("Token has an empty subject")]
    EmptySubject,
}

/// Failures reported by a [`RecordStore`](crate::store::RecordStore) adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// create-many did not report an identifier for an input position.
    #[error("No identifier returned for record at position {0}")]
    MissingId(usize),

    #[error("Expected {expected} record identifiers, got {actual}")]
    IdCountMismatch { expected: usize, actual: usize },

    #[error("Malformed record identifier: {0}")]
    InvalidId(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// A stored document could not be mapped back to a record.
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Batch-level failures. Verification outcomes are never part of this type.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Batch contains no addresses")]
    EmptyBatch,

    /// Pending records could not be created; nothing was verified.
    #[error("Failed to store pending records: {0}")]
    Create(#[source] StoreError),

    /// Verification finished but some results were not persisted.
    #[error("{failed} of {total} result updates failed: {source}")]
    Update {
        failed: usize,
        total: usize,
        #[source]
        source: StoreError,
    },
}

/// Failures while rendering stored records for export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Anything that stops the service from coming up.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors returned to HTTP clients.
///
/// The JSON body is always `{"error": "<message>"}`; internal details are
/// logged, not exposed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Please provide an array of emails")]
    InvalidPayload,

    #[error("Invalid status filter")]
    InvalidStatusFilter(String),

    #[error("Unsupported export format")]
    UnsupportedFormat(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{}", batch_message(.0))]
    Batch(#[from] BatchError),

    #[error("Failed to fetch email results")]
    Query(#[source] StoreError),

    #[error("Failed to export email results")]
    Export(#[from] ExportError),

    #[error("Internal server error")]
    Internal,
}

fn batch_message(err: &BatchError) -> &'static str {
    match err {
        BatchError::EmptyBatch => "Please provide an array of emails",
        BatchError::Create(_) => "Failed to store emails",
        BatchError::Update { .. } => "Failed to store verification results",
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload
            | ApiError::InvalidStatusFilter(_)
            | ApiError::UnsupportedFormat(_)
            | ApiError::Batch(BatchError::EmptyBatch) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Batch(_) | ApiError::Query(_) | ApiError::Export(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
