//! Resource store adapter for the street collection.
//!
//! # Collection
//!
//! Street records live in a single `PostgreSQL` table used as a document
//! collection. The schema plays the role of the database name and the
//! table the role of the collection name; both come from configuration:
//!
//! - `id` - `UUID`, generated by the store on insert
//! - `address` - non-empty text
//! - `longitude`, `latitude` - nullable, set together
//! - `created_at` - insert time, defines listing order
//!
//! # Migrations
//!
//! The collection is created on demand and run via:
//! ```bash
//! cargo run -p tankstellen-cli -- migrate
//! ```
//!
//! # Adapter contract
//!
//! [`StreetStore`] maps the four REST verbs to single-record store calls.
//! Updates and deletes report how many records they touched so that the
//! API can tell "nothing matched" apart from "the store failed". The
//! adapter holds no business logic, caching, or retries.

pub mod memory;
pub mod streets;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use tankstellen_core::{Street, StreetId, StreetInput};

pub use memory::InMemoryStreetStore;
pub use streets::PgStreetStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Number of records an update matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchCount(pub u64);

impl MatchCount {
    /// Whether no record matched the identifier.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Number of records a delete removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeleteCount(pub u64);

impl DeleteCount {
    /// Whether no record matched the identifier.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Persistence operations over one street collection.
///
/// Identifiers passed in are already syntax-checked; implementations only
/// decide existence.
#[async_trait]
pub trait StreetStore: Send + Sync {
    /// All records in store order.
    async fn list(&self) -> Result<Vec<Street>, RepositoryError>;

    /// Insert a record and return the identifier the store assigned.
    async fn insert(&self, input: &StreetInput) -> Result<StreetId, RepositoryError>;

    /// Replace address and coordinates of the record with this identifier.
    async fn replace(&self, id: StreetId, input: &StreetInput)
    -> Result<MatchCount, RepositoryError>;

    /// Remove the record with this identifier.
    async fn remove(&self, id: StreetId) -> Result<DeleteCount, RepositoryError>;

    /// Check that the store answers and the collection exists.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Errors building a [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("invalid schema name: {0:?}")]
    InvalidSchema(String),
    #[error("invalid collection name: {0:?}")]
    InvalidTable(String),
}

/// A validated schema/table pair naming the street collection.
///
/// Names are restricted to `[A-Za-z_][A-Za-z0-9_]*` (max 63 bytes) so they
/// can be interpolated into SQL as quoted identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    schema: String,
    table: String,
}

impl Collection {
    pub const DEFAULT_SCHEMA: &'static str = "tankstellen";
    pub const DEFAULT_TABLE: &'static str = "streets";

    /// Maximum identifier length accepted by `PostgreSQL`.
    const MAX_IDENT_LEN: usize = 63;

    /// Validate a schema and table name.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if either name is not a plain identifier.
    pub fn new(schema: &str, table: &str) -> Result<Self, CollectionError> {
        if !is_identifier(schema) {
            return Err(CollectionError::InvalidSchema(schema.to_owned()));
        }
        if !is_identifier(table) {
            return Err(CollectionError::InvalidTable(table.to_owned()));
        }
        Ok(Self {
            schema: schema.to_owned(),
            table: table.to_owned(),
        })
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted `"schema"."table"` for use in SQL.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!(r#""{}"."{}""#, self.schema, self.table)
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            schema: Self::DEFAULT_SCHEMA.to_owned(),
            table: Self::DEFAULT_TABLE.to_owned(),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= Collection::MAX_IDENT_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
