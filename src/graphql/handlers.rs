use actix_web::{HttpResponse, Responder, web};
use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::auth::Principal;
use crate::graphql::schema::AppSchema;

/// Handles incoming GraphQL requests.
///
/// Must run behind the [`Auth`](crate::auth::Auth) middleware: the resolved
/// [`Principal`] is forwarded to resolvers as request data.
pub async fn graphql_handler(
    schema: web::Data<AppSchema>,
    principal: web::ReqData<Principal>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner().data(principal.into_inner());
    schema.execute(request).await.into()
}

/// Serves the GraphQL Playground interface for interactive query testing.
///
/// The Playground is configured to send requests to `/api/v1/graphql`.
pub async fn graphql_playground() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(playground_source(GraphQLPlaygroundConfig::new(
            "/api/v1/graphql",
        )))
}
