use crate::models::verification::{StoredRecord, VerificationResult};
use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /verify-emails`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyEmailsRequest {
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, SimpleObject)]
pub struct VerifyEmailsResponse {
    pub message: String,
    pub results: Vec<VerificationResult>,
}

impl VerifyEmailsResponse {
    pub fn new(results: Vec<VerificationResult>) -> Self {
        Self {
            message: format!("Successfully verified {} emails", results.len()),
            results,
        }
    }
}

/// Query string of `GET /email-results`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailResultsQuery {
    /// Only return records with this status (case-insensitive)
    pub status: Option<String>,
    /// `json` (default) or `csv`
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmailResultsResponse {
    pub emails: Vec<StoredRecord>,
}
