use crate::auth::JwtAuthority;
use crate::batch::BatchRunner;
use crate::config::{AppConfig, ResolverBackend, StoreBackend};
use crate::error::{ConfigError, StartupError};
use crate::graphql::schema::{AppSchema, create_schema};
use crate::handlers::validation::{
    DisposableRegistry, DohResolver, DomainResolver, SystemResolver, VerificationPipeline,
};
use crate::store::{MemoryRecordStore, MongoRecordStore, RecordStore};
use actix_web::web;
use mongodb::Client;
use mongodb::bson::Document;
use std::sync::Arc;
use tracing::info;

/// Long-lived services shared by every worker of the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub runner: Arc<BatchRunner>,
    pub authority: Arc<JwtAuthority>,
    pub schema: AppSchema,
}

impl AppState {
    /// Wires the services together from already-built parts.
    pub fn new(
        store: Arc<dyn RecordStore>,
        registry: Arc<DisposableRegistry>,
        resolver: Arc<dyn DomainResolver>,
        authority: JwtAuthority,
        concurrency: Option<usize>,
    ) -> Self {
        let pipeline = Arc::new(VerificationPipeline::new(registry, resolver));
        let runner =
            Arc::new(BatchRunner::new(pipeline, store.clone()).with_concurrency(concurrency));
        let schema = create_schema(runner.clone(), store.clone());

        Self {
            store,
            runner,
            authority: Arc::new(authority),
            schema,
        }
    }

    /// Registers the shared services as app data for handlers and the
    /// [`Auth`](crate::auth::Auth) middleware.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.store.clone()))
            .app_data(web::Data::from(self.runner.clone()))
            .app_data(web::Data::from(self.authority.clone()))
            .app_data(web::Data::new(self.schema.clone()));
    }

    /// Connects the configured backends. The disposable registry is loaded
    /// once here and never refreshed.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let (store, registry): (Arc<dyn RecordStore>, DisposableRegistry) =
            match config.store_backend {
                StoreBackend::Mongo => {
                    let uri = config
                        .mongodb_uri
                        .as_deref()
                        .ok_or(ConfigError::Missing("MONGODB_URI"))?;
                    let client = Client::with_uri_str(uri).await?;

                    let store = MongoRecordStore::new(
                        &client,
                        &config.db_name,
                        &config.verifications_collection,
                    );
                    store.ensure_indexes().await?;

                    let registry = match &config.disposable_collection {
                        Some(name) => {
                            let collection = client
                                .database(&config.db_name)
                                .collection::<Document>(name);
                            DisposableRegistry::with_collection(&collection).await?
                        }
                        None => DisposableRegistry::builtin(),
                    };
                    let store: Arc<dyn RecordStore> = Arc::new(store);
                    (store, registry)
                }
                StoreBackend::Memory => {
                    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
                    (store, DisposableRegistry::builtin())
                }
            };

        let resolver: Arc<dyn DomainResolver> = match config.resolver_backend {
            ResolverBackend::Doh => Arc::new(DohResolver::new(
                config.doh_endpoint.clone(),
                config.resolver_timeout,
            )?),
            ResolverBackend::System => Arc::new(SystemResolver::new(config.resolver_timeout)),
        };

        info!(
            store = ?config.store_backend,
            resolver = ?config.resolver_backend,
            disposable_domains = registry.len(),
            concurrency = ?config.verify_concurrency,
            "services initialized"
        );

        Ok(Self::new(
            store,
            Arc::new(registry),
            resolver,
            JwtAuthority::new(&config.jwt_secret, config.jwt_audience.clone()),
            config.verify_concurrency,
        ))
    }
}
