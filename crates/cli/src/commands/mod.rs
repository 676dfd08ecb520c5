//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod streets;

use tankstellen_server::config::ServerConfig;
use tankstellen_server::db::{self, PgStreetStore};

/// Connect to the configured collection.
///
/// Uses the same environment variables as the server, so the CLI always
/// writes where the server reads.
async fn connect_store() -> Result<PgStreetStore, Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    tracing::info!(collection = %config.collection, "Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    Ok(PgStreetStore::new(pool, config.collection))
}
