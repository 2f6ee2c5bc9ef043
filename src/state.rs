use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CatalogService, SeaOrmCatalogService, SeaOrmSocialService, SeaOrmUserService, SocialService,
    UserService,
};

/// Everything a request handler or CLI command needs, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Arc<Store>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub social_service: Arc<dyn SocialService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let store = Arc::new(store);
        let config = Arc::new(RwLock::new(config));

        let catalog_service: Arc<dyn CatalogService> =
            Arc::new(SeaOrmCatalogService::new(store.clone()));
        let social_service: Arc<dyn SocialService> =
            Arc::new(SeaOrmSocialService::new(store.clone()));
        let user_service: Arc<dyn UserService> =
            Arc::new(SeaOrmUserService::new(store.clone(), config.clone()));

        Self {
            config,
            store,
            catalog_service,
            social_service,
            user_service,
        }
    }
}
