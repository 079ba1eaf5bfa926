//! Shared application state handed to every handler

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::{Config, StorageBackend},
    db::{
        InMemoryListingStore, InMemoryMarketListingStore, ListingStore, MarketListingStore,
        PostgresListingStore, PostgresMarketListingStore,
    },
    services::{ListingService, MarketListingService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Present only for the Postgres backend.
    pub db_pool: Option<PgPool>,
    pub listing_service: Arc<ListingService>,
    pub market_listing_service: Arc<MarketListingService>,
}

impl AppState {
    /// Build state for the configured storage backend.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        match config.storage.backend {
            StorageBackend::Postgres => {
                let pool = connect(&config).await?;
                let listings = Arc::new(PostgresListingStore::new(pool.clone()));
                let cards = Arc::new(PostgresMarketListingStore::new(pool.clone()));
                let mut state = Self::with_stores(config, listings, cards);
                state.db_pool = Some(pool);
                Ok(state)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on shutdown");
                Ok(Self::with_stores(
                    config,
                    Arc::new(InMemoryListingStore::new()),
                    Arc::new(InMemoryMarketListingStore::new()),
                ))
            }
        }
    }

    /// Build state around existing stores.
    pub fn with_stores(
        config: Config,
        listing_store: Arc<dyn ListingStore>,
        market_listing_store: Arc<dyn MarketListingStore>,
    ) -> Self {
        let listing_service = Arc::new(ListingService::new(
            listing_store,
            config.search.max_search_terms,
        ));
        let market_listing_service = Arc::new(MarketListingService::new(market_listing_store));

        Self {
            config: Arc::new(config),
            db_pool: None,
            listing_service,
            market_listing_service,
        }
    }
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let db = &config.database;
    let pool = PgPoolOptions::new()
        .min_connections(db.pool_min_size)
        .max_connections(db.pool_max_size)
        .acquire_timeout(Duration::from_secs(db.pool_timeout_seconds))
        .connect(&db.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        min = db.pool_min_size,
        max = db.pool_max_size,
        "Database pool created"
    );

    if db.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}
