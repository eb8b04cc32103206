use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web::Data};
use email_verifier::config::AppConfig;
use email_verifier::cors::Cors;
use email_verifier::openapi::ApiDoc;
use email_verifier::state::AppState;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Email Verifier Service Entry Point
///
/// # Endpoints
/// - REST: `/api/v1/health`, `/api/v1/verify-emails`, `/api/v1/email-results`
/// - GraphQL: `/api/v1/graphql`, playground at `/api/v1/playground`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI spec: `/api-docs/openapi.json`
///
/// Configuration comes from the environment, with `.env` loaded first if
/// present.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    let state = AppState::from_config(&config)
        .await
        .map_err(io::Error::other)?;

    info!(host = %config.host, port = config.port, "starting HTTP server");

    HttpServer::new(move || {
        let openapi = ApiDoc::openapi();
        let state = state.clone();

        App::new()
            .wrap(Cors)
            .wrap(Logger::default())
            .app_data(Data::new(openapi.clone()))
            .configure(|cfg| state.register(cfg))
            .configure(email_verifier::routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
