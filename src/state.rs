// src/state.rs
// DOCUMENTATION: Shared application state
// PURPOSE: One handle to config, repositories and outbound clients

use std::sync::Arc;

use crate::config::{self, Config, StoreBackend};
use crate::db::{
    CampgroundRepository, MemoryStore, PgStore, ReviewRepository, SessionRepository,
    UserRepository,
};
use crate::services::{LoginRateLimiter, MapboxGeocoder};

/// Registered once as web::Data and shared by every worker
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    pub campgrounds: Arc<dyn CampgroundRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    /// None when no Mapbox token is configured
    pub geocoder: Option<MapboxGeocoder>,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    /// Build state for the configured backend, connecting to Postgres if needed
    pub async fn from_config(config: Config) -> Result<Self, sqlx::Error> {
        match config.store_backend {
            StoreBackend::Postgres => {
                let pool = config::init_db_pool(&config).await?;
                Ok(Self::with_store(config, Arc::new(PgStore::new(pool))))
            }
            StoreBackend::Memory => Ok(Self::with_store(config, Arc::new(MemoryStore::new()))),
        }
    }

    /// Use one store for every repository
    pub fn with_store<S>(config: Config, store: Arc<S>) -> Self
    where
        S: UserRepository + CampgroundRepository + ReviewRepository + SessionRepository + 'static,
    {
        let geocoder = if config.mapbox_token.is_empty() {
            None
        } else {
            Some(MapboxGeocoder::new(config.mapbox_token.clone()))
        };
        let login_limiter = LoginRateLimiter::per_minute(config.login_rate_limit_per_minute);

        AppState {
            users: store.clone(),
            campgrounds: store.clone(),
            reviews: store.clone(),
            sessions: store,
            geocoder,
            login_limiter,
            config,
        }
    }
}
