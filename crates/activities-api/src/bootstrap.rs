//! Store construction shared by the server and the seed binary.

use crate::config::{StoreBackend, StoreConfig};
use activity_store::{catalog, Activity, Store};
use anyhow::{Context, Result};
use tracing::info;

/// The catalog to seed: the configured file, or the built-in activities.
pub async fn seed_catalog(config: &StoreConfig) -> Result<Vec<Activity>> {
    match &config.catalog_path {
        Some(path) => catalog::load_catalog(path)
            .await
            .with_context(|| format!("Failed to load catalog from {:?}", path)),
        None => Ok(catalog::initial_activities()),
    }
}

/// Open the configured backend without seeding it.
pub async fn connect(config: &StoreConfig) -> Result<Store> {
    match config.backend {
        StoreBackend::Memory => Ok(Store::memory()),
        StoreBackend::Sqlite => Store::sqlite(&config.database_url, config.max_connections)
            .await
            .with_context(|| format!("Failed to open store at {}", config.database_url)),
    }
}

/// Open the configured backend, seeding it when it starts empty or when asked.
pub async fn open_store(config: &StoreConfig) -> Result<Store> {
    let store = connect(config).await?;

    let seed = config.seed_on_startup || config.backend == StoreBackend::Memory;
    if seed {
        store
            .seed(seed_catalog(config).await?)
            .await
            .context("Failed to seed activities")?;
    }

    let count = store.count().await.context("Failed to count activities")?;
    info!("Store ready with {} activities", count);
    Ok(store)
}
