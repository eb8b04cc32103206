use crate::auth::Auth;
use crate::graphql::handlers;
use actix_web::web;

/// GraphQL Route Configuration
///
/// The GraphQL endpoint requires a bearer token; the playground is open.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/graphql")
            .wrap(Auth)
            .route(web::post().to(handlers::graphql_handler)),
    )
    .service(web::resource("/playground").route(web::get().to(handlers::graphql_playground)));
}
