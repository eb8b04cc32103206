use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI Specification Documentation
///
/// Generated at compile time from the `#[utoipa::path]` annotations on the
/// REST handlers; served at `/api-docs/openapi.json` with Swagger UI at
/// `/swagger-ui/`.
///
/// # Tags
/// 1. **Health Check**: Service monitoring endpoints
/// 2. **Email Verification**: Batch verification and stored results
/// 3. **GraphQL**: Unified query interface
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::email::verify_emails,
        crate::routes::email::email_results,
    ),
    components(
        schemas(
            crate::models::health::HealthResponse,
            crate::models::email::VerifyEmailsRequest,
            crate::models::email::VerifyEmailsResponse,
            crate::models::email::EmailResultsResponse,
            crate::models::VerificationResult,
            crate::models::StoredRecord,
            crate::models::EmailStatus,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Email Verification", description = "Batch email verification and result export"),
        (name = "GraphQL", description = "GraphQL API for interacting with all service features")
    ),
    info(
        description = "Batch email verification with REST and GraphQL interfaces",
        title = "Email Verifier API",
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme referenced by the protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/api/v1/health"));
        assert!(paths.iter().any(|p| *p == "/api/v1/verify-emails"));
        assert!(paths.iter().any(|p| *p == "/api/v1/email-results"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
