//! `PostgreSQL`-backed street collection.
//!
//! The collection name is configuration, so statements are built once per
//! store from the validated [`Collection`] and executed with runtime
//! queries rather than compile-time checked macros.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tankstellen_core::{Coordinates, Street, StreetId, StreetInput};

use super::{Collection, DeleteCount, MatchCount, RepositoryError, StreetStore};

/// Row shape of the street table.
#[derive(Debug, sqlx::FromRow)]
struct StreetRow {
    id: Uuid,
    address: String,
    longitude: Option<f64>,
    latitude: Option<f64>,
}

impl TryFrom<StreetRow> for Street {
    type Error = RepositoryError;

    fn try_from(row: StreetRow) -> Result<Self, Self::Error> {
        let coordinates = match (row.longitude, row.latitude) {
            (Some(longitude), Some(latitude)) => Some(Coordinates::new(longitude, latitude)),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "street {} has only one coordinate",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: StreetId::new(row.id),
            address: row.address,
            coordinates,
        })
    }
}

/// SQL statements for one collection.
#[derive(Debug, Clone)]
struct Statements {
    create_schema: String,
    create_table: String,
    list: String,
    insert: String,
    replace: String,
    remove: String,
    ping: String,
}

impl Statements {
    fn for_collection(collection: &Collection) -> Self {
        let table = collection.qualified();
        Self {
            create_schema: format!(r#"CREATE SCHEMA IF NOT EXISTS "{}""#, collection.schema()),
            create_table: format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    address TEXT NOT NULL CHECK (address <> ''),
                    longitude DOUBLE PRECISION,
                    latitude DOUBLE PRECISION,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    CHECK ((longitude IS NULL) = (latitude IS NULL))
                )
                "
            ),
            list: format!(
                r"
                SELECT id, address, longitude, latitude
                FROM {table}
                ORDER BY created_at, id
                "
            ),
            insert: format!(
                r"
                INSERT INTO {table} (address, longitude, latitude)
                VALUES ($1, $2, $3)
                RETURNING id
                "
            ),
            replace: format!(
                r"
                UPDATE {table}
                SET address = $2, longitude = $3, latitude = $4
                WHERE id = $1
                "
            ),
            remove: format!("DELETE FROM {table} WHERE id = $1"),
            ping: format!("SELECT 1 FROM {table} LIMIT 0"),
        }
    }
}

/// Street store over a `PostgreSQL` pool.
///
/// The pool is opened once at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct PgStreetStore {
    pool: PgPool,
    collection: Collection,
    sql: Statements,
}

impl PgStreetStore {
    /// Create a store for the given collection.
    #[must_use]
    pub fn new(pool: PgPool, collection: Collection) -> Self {
        let sql = Statements::for_collection(&collection);
        Self {
            pool,
            collection,
            sql,
        }
    }

    /// The collection this store reads and writes.
    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema and collection table if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn ensure_collection(&self) -> Result<(), RepositoryError> {
        sqlx::query(&self.sql.create_schema)
            .execute(&self.pool)
            .await?;
        sqlx::query(&self.sql.create_table)
            .execute(&self.pool)
            .await?;
        tracing::info!(collection = %self.collection, "Collection ready");
        Ok(())
    }
}

fn split_coordinates(input: &StreetInput) -> (Option<f64>, Option<f64>) {
    input
        .coordinates
        .map_or((None, None), |c| (Some(c.longitude), Some(c.latitude)))
}

#[async_trait]
impl StreetStore for PgStreetStore {
    async fn list(&self) -> Result<Vec<Street>, RepositoryError> {
        let rows: Vec<StreetRow> = sqlx::query_as(&self.sql.list)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Street::try_from).collect()
    }

    async fn insert(&self, input: &StreetInput) -> Result<StreetId, RepositoryError> {
        let (longitude, latitude) = split_coordinates(input);
        let (id,): (Uuid,) = sqlx::query_as(&self.sql.insert)
            .bind(&input.address)
            .bind(longitude)
            .bind(latitude)
            .fetch_one(&self.pool)
            .await?;

        Ok(StreetId::new(id))
    }

    async fn replace(
        &self,
        id: StreetId,
        input: &StreetInput,
    ) -> Result<MatchCount, RepositoryError> {
        let (longitude, latitude) = split_coordinates(input);
        let result = sqlx::query(&self.sql.replace)
            .bind(id)
            .bind(&input.address)
            .bind(longitude)
            .bind(latitude)
            .execute(&self.pool)
            .await?;

        Ok(MatchCount(result.rows_affected()))
    }

    async fn remove(&self, id: StreetId) -> Result<DeleteCount, RepositoryError> {
        let result = sqlx::query(&self.sql.remove)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteCount(result.rows_affected()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query(&self.sql.ping).execute(&self.pool).await?;
        Ok(())
    }
}
