use crate::auth::Principal;
use crate::batch::BatchRunner;
use crate::error::ApiError;
use crate::models::email::VerifyEmailsResponse;
use crate::models::{EmailStatus, RecordQuery, StoredRecord};
use crate::store::RecordStore;
use async_graphql::{Context, Error, Object, Result};
use std::sync::Arc;
use tracing::error;

fn require_principal<'a>(ctx: &'a Context<'_>) -> Result<&'a Principal> {
    ctx.data_opt::<Principal>()
        .ok_or_else(|| Error::new(ApiError::Unauthorized.to_string()))
}

/// Read side: the caller's stored verification records.
#[derive(Default)]
pub struct EmailQuery;

#[Object]
impl EmailQuery {
    /// Records owned by the caller, newest first, optionally narrowed to one
    /// status.
    async fn email_results(
        &self,
        ctx: &Context<'_>,
        status: Option<EmailStatus>,
    ) -> Result<Vec<StoredRecord>> {
        let principal = require_principal(ctx)?;
        let store = ctx.data::<Arc<dyn RecordStore>>()?;

        store
            .query(RecordQuery {
                user_id: principal.user_id.clone(),
                status,
            })
            .await
            .map_err(|err| {
                error!(user_id = %principal.user_id, error = %err, "result query failed");
                Error::new(ApiError::Query(err).to_string())
            })
    }
}

/// Write side: batch verification.
#[derive(Default)]
pub struct EmailMutation;

#[Object]
impl EmailMutation {
    /// Verifies every address and records the outcomes for the caller.
    /// Results are returned in input order.
    async fn verify_emails(
        &self,
        ctx: &Context<'_>,
        emails: Vec<String>,
    ) -> Result<VerifyEmailsResponse> {
        let principal = require_principal(ctx)?;
        let runner = ctx.data::<Arc<BatchRunner>>()?;

        let results = runner
            .run(&emails, principal)
            .await
            .map_err(|err| Error::new(ApiError::from(err).to_string()))?;
        Ok(VerifyEmailsResponse::new(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::schema::create_schema;
    use crate::handlers::validation::dnsmx::{DomainCheck, MockDomainResolver};
    use crate::handlers::validation::{DisposableRegistry, VerificationPipeline};
    use crate::store::MemoryRecordStore;
    use async_graphql::Request;

    fn schema_with_memory_store() -> crate::graphql::schema::AppSchema {
        let mut resolver = MockDomainResolver::new();
        resolver
            .expect_resolve_mx()
            .returning(|domain| DomainCheck::new(domain != "gone.example", true));
        let pipeline = Arc::new(VerificationPipeline::new(
            Arc::new(DisposableRegistry::builtin()),
            Arc::new(resolver),
        ));
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let runner = Arc::new(BatchRunner::new(pipeline, store.clone()));
        create_schema(runner, store)
    }

    fn as_user(query: &str, user_id: &str) -> Request {
        Request::new(query).data(Principal {
            user_id: user_id.into(),
        })
    }

    #[tokio::test]
    async fn test_verify_emails_mutation() {
        let schema = schema_with_memory_store();
        let query = r#"
            mutation {
                verifyEmails(emails: ["User@Example.com", "nope", "x@yopmail.com", "a@gone.example"]) {
                    message
                    results { email status reason syntaxValid domainExists mxRecordsExist }
                }
            }
        "#;

        let response = schema.execute(as_user(query, "u1")).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let data = response.data.into_json().unwrap();
        let payload = &data["verifyEmails"];
        assert_eq!(payload["message"], "Successfully verified 4 emails");

        let results = payload["results"].as_array().unwrap();
        assert_eq!(results[0]["email"], "user@example.com");
        assert_eq!(results[0]["status"], "VALID");
        assert_eq!(results[1]["status"], "INVALID");
        assert_eq!(results[1]["syntaxValid"], false);
        assert_eq!(results[2]["status"], "DISPOSABLE");
        assert_eq!(results[3]["reason"], "Domain does not exist");
    }

    #[tokio::test]
    async fn test_empty_batch_is_an_error() {
        let schema = schema_with_memory_store();
        let response = schema
            .execute(as_user(
                "mutation { verifyEmails(emails: []) { message } }",
                "u1",
            ))
            .await;

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Please provide an array of emails");
    }

    #[tokio::test]
    async fn test_results_are_scoped_and_filtered() {
        let schema = schema_with_memory_store();
        schema
            .execute(as_user(
                r#"mutation { verifyEmails(emails: ["a@example.com", "bad"]) { message } }"#,
                "u1",
            ))
            .await;
        schema
            .execute(as_user(
                r#"mutation { verifyEmails(emails: ["c@example.com"]) { message } }"#,
                "u2",
            ))
            .await;

        let response = schema
            .execute(as_user("{ emailResults { email userId } }", "u1"))
            .await;
        let data = response.data.into_json().unwrap();
        let records = data["emailResults"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r["userId"] == "u1"));

        let response = schema
            .execute(as_user("{ emailResults(status: INVALID) { email } }", "u1"))
            .await;
        let data = response.data.into_json().unwrap();
        assert_eq!(data["emailResults"][0]["email"], "bad");
        assert_eq!(data["emailResults"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthorized() {
        let schema = schema_with_memory_store();
        let response = schema.execute("{ emailResults { email } }").await;

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Unauthorized");
    }
}
