//! Collection setup.
//!
//! # Usage
//!
//! ```bash
//! tankstellen migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STREETS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STREETS_SCHEMA` - Schema holding the collection (default `tankstellen`)
//! - `STREETS_COLLECTION` - Collection table name (default `streets`)
//!
//! The statements are idempotent, so running the command twice is harmless.

/// Create the schema and collection table.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database is
/// unreachable, or a statement fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::connect_store().await?;

    tracing::info!(collection = %store.collection(), "Creating collection...");
    store.ensure_collection().await?;

    tracing::info!("Migration complete!");
    Ok(())
}
