//! Reset the activity store to the seed catalog.

use activities_api::{bootstrap, config::Config, logging::init_logging};
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    init_logging(&config.log);

    let store = bootstrap::connect(&config.store).await?;
    let catalog = bootstrap::seed_catalog(&config.store).await?;
    let count = catalog.len();

    store
        .seed(catalog)
        .await
        .context("Failed to seed activities")?;
    store.close().await;

    info!("Database initialized with {} activities", count);
    Ok(())
}
