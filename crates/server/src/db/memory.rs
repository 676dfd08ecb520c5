//! In-memory street store.
//!
//! Backs the route and integration tests, which need a real [`StreetStore`]
//! without a database.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use tankstellen_core::{Street, StreetId, StreetInput};

use super::{DeleteCount, MatchCount, RepositoryError, StreetStore};

/// In-memory street collection.
///
/// Intended for tests and local demos. Records keep insertion order, which
/// is the store order reported by [`StreetStore::list`]. Identifiers are
/// random v4 UUIDs assigned on insert.
#[derive(Debug, Default)]
pub struct InMemoryStreetStore {
    records: RwLock<Vec<Street>>,
}

impl InMemoryStreetStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records in order.
    #[must_use]
    pub const fn with_records(records: Vec<Street>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of records currently stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    /// Returns `true` if the store is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("lock poisoned".to_owned())
}

#[async_trait]
impl StreetStore for InMemoryStreetStore {
    async fn list(&self) -> Result<Vec<Street>, RepositoryError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    async fn insert(&self, input: &StreetInput) -> Result<StreetId, RepositoryError> {
        let id = StreetId::new(Uuid::new_v4());
        self.records
            .write()
            .map_err(poisoned)?
            .push(input.clone().into_street(id));
        Ok(id)
    }

    async fn replace(
        &self,
        id: StreetId,
        input: &StreetInput,
    ) -> Result<MatchCount, RepositoryError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(MatchCount(0));
        };
        *record = input.clone().into_street(id);
        Ok(MatchCount(1))
    }

    async fn remove(&self, id: StreetId) -> Result<DeleteCount, RepositoryError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(DeleteCount((before - records.len()) as u64))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.records.read().map(|_| ()).map_err(poisoned)
    }
}
