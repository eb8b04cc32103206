use super::email::{EmailMutation, EmailQuery};
use super::health::HealthQuery;
use crate::batch::BatchRunner;
use crate::store::RecordStore;
use async_graphql::{EmptySubscription, MergedObject, Schema};
use std::sync::Arc;

/// Root query type, merging health and email result queries.
#[derive(MergedObject, Default)]
pub struct QueryRoot(HealthQuery, EmailQuery);

/// Main GraphQL Schema Definition
///
/// Queries expose health and the caller's stored records; the single
/// mutation runs a verification batch. Subscriptions are unused.
pub type AppSchema = Schema<QueryRoot, EmailMutation, EmptySubscription>;

/// Creates the schema with the batch runner and record store attached as
/// schema data. The requesting [`Principal`](crate::auth::Principal) is
/// attached per request by the HTTP handler.
pub fn create_schema(runner: Arc<BatchRunner>, store: Arc<dyn RecordStore>) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        EmailMutation,
        EmptySubscription,
    )
    .data(runner)
    .data(store)
    .finish()
}
