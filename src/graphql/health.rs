use crate::models::health::HealthResponse;
use async_graphql::{Object, SimpleObject};

/// Liveness of the verifier, same payload as `GET /api/v1/health`.
#[derive(Debug, SimpleObject)]
pub struct ServiceHealth {
    /// Always "UP" while requests are being served
    pub status: String,
    /// Crate version of the running build
    pub version: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl From<HealthResponse> for ServiceHealth {
    fn from(response: HealthResponse) -> Self {
        let HealthResponse {
            status,
            version,
            timestamp,
        } = response;
        Self {
            status,
            version,
            timestamp,
        }
    }
}

#[derive(Default)]
pub struct HealthQuery;

#[Object]
impl HealthQuery {
    /// Open to anonymous callers; no principal is read.
    async fn health(&self) -> ServiceHealth {
        HealthResponse::up().into()
    }
}
