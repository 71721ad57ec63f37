use anyhow::{Context, Result};
use house_frontdesk::{router, DEFAULT_ADDR};
use house_store::{SqliteStorage, Store, StoreConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("House of Swass Front Desk v0.1.0");

    let config = StoreConfig::from_env();

    let storage = SqliteStorage::new(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    info!("Snapshot storage at: {}", config.db_path.display());

    let store = Arc::new(Store::open(config, storage));
    let app = router(store);

    // Start HTTP server
    let addr = std::env::var("FRONTDESK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
