use crate::auth::{Auth, Principal};
use crate::batch::BatchRunner;
use crate::error::ApiError;
use crate::export::{CSV_FILENAME, records_to_csv};
use crate::models::email::{
    EmailResultsQuery, EmailResultsResponse, VerifyEmailsRequest, VerifyEmailsResponse,
};
use crate::models::{EmailStatus, RecordQuery};
use crate::store::RecordStore;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Json,
    Csv,
}

fn parse_format(raw: Option<&str>) -> Result<ExportFormat, ApiError> {
    match raw.map(|f| f.trim().to_ascii_lowercase()) {
        None => Ok(ExportFormat::Json),
        Some(f) if f.is_empty() || f == "json" => Ok(ExportFormat::Json),
        Some(f) if f == "csv" => Ok(ExportFormat::Csv),
        Some(f) => Err(ApiError::UnsupportedFormat(f)),
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<EmailStatus>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(ApiError::InvalidStatusFilter),
    }
}

/// JSON body errors (malformed JSON, `emails` not an array of strings) are
/// answered like an empty batch.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!(path = req.path(), error = %err, "rejected verification payload");
        ApiError::InvalidPayload.into()
    })
}

/// # Batch Verification Endpoint
///
/// Verifies every address in `emails` for the authenticated caller and
/// returns one result per input element, in input order. Each address is
/// recorded as PENDING first and updated with its outcome.
///
/// ## Example Request
/// ```json
/// { "emails": ["user@example.com", "someone@mailinator.com"] }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/verify-emails",
    request_body = VerifyEmailsRequest,
    responses(
        (status = 200, description = "All addresses verified", body = VerifyEmailsResponse),
        (status = 400, description = "Missing, empty or malformed `emails` array"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Records could not be stored")
    ),
    security(("bearer_auth" = [])),
    tag = "Email Verification"
)]
#[post("/verify-emails", wrap = "Auth")]
pub async fn verify_emails(
    runner: web::Data<BatchRunner>,
    principal: web::ReqData<Principal>,
    body: web::Json<VerifyEmailsRequest>,
) -> Result<HttpResponse, ApiError> {
    let results = runner.run(&body.emails, &principal).await?;
    Ok(HttpResponse::Ok().json(VerifyEmailsResponse::new(results)))
}

/// # Verification Results Endpoint
///
/// Lists the caller's stored records, newest first. `status` narrows the
/// list to one status (case-insensitive); `format=csv` returns the same rows
/// as a CSV attachment.
#[utoipa::path(
    get,
    path = "/api/v1/email-results",
    params(EmailResultsQuery),
    responses(
        (status = 200, description = "Caller's records", body = EmailResultsResponse),
        (status = 400, description = "Unknown status filter or export format"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Records could not be read")
    ),
    security(("bearer_auth" = [])),
    tag = "Email Verification"
)]
#[get("/email-results", wrap = "Auth")]
pub async fn email_results(
    store: web::Data<dyn RecordStore>,
    principal: web::ReqData<Principal>,
    query: web::Query<EmailResultsQuery>,
) -> Result<HttpResponse, ApiError> {
    let status = parse_status(query.status.as_deref())?;
    let format = parse_format(query.format.as_deref())?;

    let records = store
        .query(RecordQuery {
            user_id: principal.user_id.clone(),
            status,
        })
        .await
        .map_err(|err| {
            error!(user_id = %principal.user_id, error = %err, "result query failed");
            ApiError::Query(err)
        })?;

    match format {
        ExportFormat::Json => Ok(HttpResponse::Ok().json(EmailResultsResponse { emails: records })),
        ExportFormat::Csv => {
            let body = records_to_csv(&records)?;
            Ok(HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(CSV_FILENAME.to_string())],
                })
                .body(body))
        }
    }
}

/// Registers the authenticated email endpoints.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(verify_emails)
        .service(email_results);
}
