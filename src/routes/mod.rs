use actix_web::web;

/// Liveness endpoint, `GET /health`.
pub mod health;

/// # Email Verification Endpoints
///
/// Both endpoints require a bearer token and act on the caller's records only.
///
/// ```text
/// POST /verify-emails             { "emails": [...] }
/// GET  /email-results?status=&format=json|csv
/// ```
pub mod email;

/// GraphQL endpoint and playground.
pub mod graphql;

#[cfg(test)]
mod email_test;

/// # API Route Configuration
///
/// Mounts every endpoint under the `/api/v1` base path.
///
/// ```text
/// GET  /api/v1/health
/// POST /api/v1/verify-emails
/// GET  /api/v1/email-results
/// POST /api/v1/graphql
/// GET  /api/v1/playground
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure_routes)
            .configure(email::configure_routes)
            .configure(graphql::configure_routes),
    );
}
