#[cfg(test)]
mod email_route_tests {
    use crate::auth::JwtAuthority;
    use crate::cors::Cors;
    use crate::error::StoreError;
    use crate::handlers::validation::DisposableRegistry;
    use crate::handlers::validation::dnsmx::{DomainCheck, MockDomainResolver};
    use crate::models::{PendingRecord, RecordQuery, StoredRecord};
    use crate::state::AppState;
    use crate::store::{MemoryRecordStore, MockRecordStore, RecordStore};
    use actix_http::Request;
    use actix_web::body::{BoxBody, EitherBody};
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::{Method, StatusCode};
    use actix_web::{App, test};
    use chrono::Duration;
    use serde_json::{Value, json};
    use std::sync::Arc;

    const SECRET: &str = "route-test-secret";

    fn resolver() -> MockDomainResolver {
        let mut resolver = MockDomainResolver::new();
        resolver.expect_resolve_mx().returning(|domain| match domain {
            "nonexistent-domain-xyz123.test" => DomainCheck::new(false, false),
            "nomx.example" => DomainCheck::new(true, false),
            _ => DomainCheck::new(true, true),
        });
        resolver
    }

    fn state_with(store: Arc<dyn RecordStore>) -> AppState {
        AppState::new(
            store,
            Arc::new(DisposableRegistry::builtin()),
            Arc::new(resolver()),
            JwtAuthority::new(SECRET, None),
            None,
        )
    }

    fn bearer(user_id: &str) -> (&'static str, String) {
        let token = JwtAuthority::new(SECRET, None)
            .issue(user_id, Duration::minutes(5))
            .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    async fn app(
        state: AppState,
    ) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .wrap(Cors)
                .configure(|cfg| state.register(cfg))
                .configure(crate::routes::configure),
        )
        .await
    }

    #[actix_web::test]
    async fn test_verify_emails_end_to_end() {
        let store = Arc::new(MemoryRecordStore::new());
        let app = app(state_with(store.clone())).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify-emails")
            .insert_header(bearer("u1"))
            .set_json(json!({
                "emails": [
                    "User@Example.com",
                    "not-an-email",
                    "someone@mailinator.com",
                    "a@nonexistent-domain-xyz123.test",
                    "b@nomx.example"
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Successfully verified 5 emails");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 5);

        assert_eq!(results[0]["email"], "user@example.com");
        assert_eq!(results[0]["status"], "VALID");
        assert_eq!(results[0]["reason"], "Email validation passed all checks");

        assert_eq!(results[1]["status"], "INVALID");
        assert_eq!(results[1]["reason"], "Invalid email syntax");
        assert_eq!(results[1]["syntax_valid"], false);

        assert_eq!(results[2]["status"], "DISPOSABLE");
        assert_eq!(results[2]["domain_exists"], true);
        assert_eq!(results[2]["mx_records_exist"], false);

        assert_eq!(results[3]["reason"], "Domain does not exist");
        assert_eq!(results[4]["reason"], "No MX records found for domain");

        let stored = store
            .query(RecordQuery {
                user_id: "u1".into(),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(stored.len(), 5);
        assert!(stored.iter().all(|r| r.verified_at.is_some()));
    }

    #[actix_web::test]
    async fn test_verify_emails_requires_token() {
        let store = Arc::new(MemoryRecordStore::new());
        let app = app(state_with(store.clone())).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify-emails")
            .set_json(json!({ "emails": ["a@example.com"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized");
        assert!(store.is_empty().await);
    }

    #[actix_web::test]
    async fn test_verify_emails_rejects_bad_payloads() {
        let app = app(state_with(Arc::new(MemoryRecordStore::new()))).await;

        let payloads = [
            json!({}),
            json!({ "emails": [] }),
            json!({ "emails": "a@example.com" }),
            json!({ "emails": [1, 2] }),
        ];
        for payload in payloads {
            let req = test::TestRequest::post()
                .uri("/api/v1/verify-emails")
                .insert_header(bearer("u1"))
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Please provide an array of emails");
        }
    }

    #[actix_web::test]
    async fn test_store_failure_is_server_error() {
        let mut store = MockRecordStore::new();
        store
            .expect_create_many()
            .returning(|_| Err(StoreError::MissingId(0)));
        let app = app(state_with(Arc::new(store))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify-emails")
            .insert_header(bearer("u1"))
            .set_json(json!({ "emails": ["a@example.com"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to store emails");
    }

    #[actix_web::test]
    async fn test_update_failure_is_server_error() {
        let mut store = MockRecordStore::new();
        store
            .expect_create_many()
            .returning(|records| Ok((0..records.len()).map(|i| i.to_string()).collect()));
        store
            .expect_update_by_id()
            .returning(|id, _| Err(StoreError::NotFound(id.to_string())));
        let app = app(state_with(Arc::new(store))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify-emails")
            .insert_header(bearer("u1"))
            .set_json(json!({ "emails": ["a@example.com"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to store verification results");
    }

    async fn seeded_store() -> Arc<MemoryRecordStore> {
        let store = Arc::new(MemoryRecordStore::new());
        store
            .create_many(vec![
                PendingRecord::new("pending@example.com", "u1"),
                PendingRecord::new("other@example.com", "u2"),
            ])
            .await
            .unwrap();
        store
    }

    #[actix_web::test]
    async fn test_email_results_json_scoped_to_caller() {
        let store = seeded_store().await;
        let app = app(state_with(store)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/email-results")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let emails: Vec<StoredRecord> = serde_json::from_value(body["emails"].clone()).unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].email, "pending@example.com");
        assert_eq!(emails[0].syntax_valid, None);
    }

    #[actix_web::test]
    async fn test_email_results_status_filter() {
        let store = seeded_store().await;
        let app = app(state_with(store)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/email-results?status=valid")
            .insert_header(bearer("u1"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["emails"], json!([]));

        let req = test::TestRequest::get()
            .uri("/api/v1/email-results?status=finished")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid status filter");
    }

    #[actix_web::test]
    async fn test_email_results_csv_export() {
        let store = seeded_store().await;
        let app = app(state_with(store)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/email-results?format=csv")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "text/csv");
        assert_eq!(
            resp.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"email_verification_results.csv\""
        );

        let body = test::read_body(resp).await;
        let csv = std::str::from_utf8(&body).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "email,status,reason,syntax_valid,domain_exists,mx_records_exist,verified_at"
        );
        assert!(lines.next().unwrap().starts_with("\"pending@example.com\",\"PENDING\""));
        assert_eq!(lines.next(), None);
    }

    #[actix_web::test]
    async fn test_email_results_unknown_format() {
        let app = app(state_with(Arc::new(MemoryRecordStore::new()))).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/email-results?format=xml")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unsupported export format");
    }

    #[actix_web::test]
    async fn test_preflight_and_health_are_open() {
        let app = app(state_with(Arc::new(MemoryRecordStore::new()))).await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/v1/verify-emails")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-headers").unwrap(),
            "authorization, x-client-info, apikey, content-type"
        );

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
