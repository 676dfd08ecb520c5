//! Client-side sync controller.
//!
//! [`StreetSync`] owns the cache (the last full listing). Filtering and
//! sorting are one-shot displays derived from the whole cache; neither is
//! remembered, so every refresh renders the cache in server order. Writes
//! go to the API and, when they succeed, trigger a full refetch.
//!
//! ```text
//! Idle ─▶ Fetching ─▶ Ready ─▶ Mutating ─▶ Fetching ─▶ Ready
//!            │                    │            │
//!            ▼                    ▼            ▼
//!       FetchFailed         MutateFailed   FetchFailed
//! ```

use thiserror::Error;

use tankstellen_core::{ApiMessage, Street, StreetId, StreetInput};

use crate::api::StreetApi;
use crate::error::ClientError;
use crate::presenter::Presenter;
use crate::view;

/// Notice shown after every accepted write.
pub const SUCCESS_NOTICE: &str = "Operation successful";

/// Where the controller is in its fetch/mutate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A listing request is in flight.
    Fetching,
    /// The cache holds the latest listing.
    Ready,
    /// The last listing request failed; the previous cache is kept.
    FetchFailed,
    /// A write request is in flight.
    Mutating,
    /// The last write was rejected; the cache is unchanged.
    MutateFailed,
}

/// A write against the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(StreetInput),
    Update(StreetId, StreetInput),
    Delete(StreetId),
}

impl Mutation {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(..) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Errors returned by the controller after they have been reported to the
/// presenter.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing the collection failed.
    #[error("failed to fetch streets: {0}")]
    Fetch(#[source] ClientError),

    /// The write was rejected or never arrived.
    #[error("failed to save street: {0}")]
    Mutate(#[source] ClientError),
}

impl SyncError {
    /// The underlying client error.
    #[must_use]
    pub const fn client_error(&self) -> &ClientError {
        match self {
            Self::Fetch(e) | Self::Mutate(e) => e,
        }
    }
}

/// Cache owner and sync state machine.
///
/// Calls take `&mut self`, so operations on one controller never overlap.
pub struct StreetSync<A, P> {
    api: A,
    presenter: P,
    cache: Vec<Street>,
    state: SyncState,
}

impl<A: StreetApi, P: Presenter> StreetSync<A, P> {
    /// Create an idle controller with an empty cache.
    pub const fn new(api: A, presenter: P) -> Self {
        Self {
            api,
            presenter,
            cache: Vec::new(),
            state: SyncState::Idle,
        }
    }

    /// Initial load.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Fetch` if the listing fails.
    pub async fn start(&mut self) -> Result<(), SyncError> {
        self.refresh().await
    }

    /// Refetch the whole collection, replace the cache and render it in
    /// server order.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Fetch` if the listing fails. The error has already
    /// been reported and the previous cache is kept.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        self.state = SyncState::Fetching;

        match self.api.list().await {
            Ok(streets) => {
                tracing::debug!(count = streets.len(), "Cache refreshed");
                self.cache = streets;
                self.state = SyncState::Ready;
                self.presenter.render(&self.cache);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch streets");
                self.state = SyncState::FetchFailed;
                self.presenter
                    .report_error(&format!("Error: {}", e.user_message()));
                Err(SyncError::Fetch(e))
            }
        }
    }

    /// Render the cached records whose address contains `term`.
    /// A blank term shows everything.
    pub fn filter(&mut self, term: &str) -> Vec<Street> {
        let rows = view::filter(&self.cache, term);
        self.presenter.render(&rows);
        rows
    }

    /// Render the whole cache ordered by address, A before Z.
    pub fn sort_ascending(&mut self) -> Vec<Street> {
        let rows = view::sort_ascending(&self.cache);
        self.presenter.render(&rows);
        rows
    }

    /// Render the whole cache ordered by address, Z before A.
    pub fn sort_descending(&mut self) -> Vec<Street> {
        let rows = view::sort_descending(&self.cache);
        self.presenter.render(&rows);
        rows
    }

    /// Send a write; on success announce it and refetch.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Mutate` if the write fails, leaving the cache
    /// unchanged, or `SyncError::Fetch` if the write succeeded but the
    /// following refresh did not.
    pub async fn mutate(&mut self, mutation: Mutation) -> Result<ApiMessage, SyncError> {
        let kind = mutation.kind();
        self.state = SyncState::Mutating;

        let result = match &mutation {
            Mutation::Create(input) => self.api.create(input).await,
            Mutation::Update(id, input) => self.api.update(*id, input).await,
            Mutation::Delete(id) => self.api.delete(*id).await,
        };

        match result {
            Ok(confirmation) => {
                tracing::info!(operation = kind, confirmation = %confirmation.message, "Write accepted");
                self.presenter.notify(SUCCESS_NOTICE);
                self.refresh().await?;
                Ok(confirmation)
            }
            Err(e) => {
                tracing::warn!(operation = kind, error = %e, "Write rejected");
                self.state = SyncState::MutateFailed;
                self.presenter
                    .report_error(&format!("Error: {}", e.user_message()));
                Err(SyncError::Mutate(e))
            }
        }
    }

    /// The last full listing, in server order.
    #[must_use]
    pub fn cache(&self) -> &[Street] {
        &self.cache
    }

    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub const fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;

    /// In-memory API with switchable failures.
    #[derive(Default)]
    struct FakeApi {
        records: Mutex<Vec<Street>>,
        next_id: AtomicUsize,
        fail_list: AtomicBool,
        fail_writes: AtomicBool,
        list_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with(addresses: &[&str]) -> Self {
            let api = Self::default();
            for address in addresses {
                api.push(address);
            }
            api
        }

        fn push(&self, address: &str) -> StreetId {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let id = StreetId::from(Uuid::from_u128(u128::try_from(n).unwrap()));
            self.records.lock().unwrap().push(Street {
                id,
                address: address.to_string(),
                coordinates: None,
            });
            id
        }

        fn rejected() -> ClientError {
            ClientError::Api {
                status: 404,
                message: "Street not found".to_string(),
            }
        }
    }

    #[async_trait]
    impl StreetApi for FakeApi {
        async fn list(&self) -> Result<Vec<Street>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Failed to fetch streets".to_string(),
                });
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, input: &StreetInput) -> Result<ApiMessage, ClientError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::rejected());
            }
            let id = self.push(&input.address);
            Ok(ApiMessage::new("Street added").with_id(id))
        }

        async fn update(
            &self,
            id: StreetId,
            input: &StreetInput,
        ) -> Result<ApiMessage, ClientError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::rejected());
            }
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(Self::rejected)?;
            *record = input.clone().into_street(id);
            Ok(ApiMessage::new("Street updated"))
        }

        async fn delete(&self, id: StreetId) -> Result<ApiMessage, ClientError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::rejected());
            }
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|s| s.id != id);
            if records.len() == before {
                return Err(Self::rejected());
            }
            Ok(ApiMessage::new("Street deleted"))
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        renders: Vec<Vec<String>>,
        notices: Vec<String>,
        errors: Vec<String>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, streets: &[Street]) {
            self.renders
                .push(streets.iter().map(|s| s.address.clone()).collect());
        }

        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }

        fn report_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    fn controller(addresses: &[&str]) -> StreetSync<FakeApi, RecordingPresenter> {
        StreetSync::new(FakeApi::with(addresses), RecordingPresenter::default())
    }

    fn input(address: &str) -> StreetInput {
        StreetInput::new(address, None).unwrap()
    }

    #[tokio::test]
    async fn test_start_fills_cache_and_renders() {
        let mut sync = controller(&["Bonner Str. 98", "Aachener Str. 1"]);
        assert_eq!(sync.state(), SyncState::Idle);

        sync.start().await.unwrap();

        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.cache().len(), 2);
        assert_eq!(
            sync.presenter().renders,
            vec![vec!["Bonner Str. 98", "Aachener Str. 1"]]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_cache() {
        let mut sync = controller(&["Bonner Str. 98"]);
        sync.start().await.unwrap();

        sync.api().fail_list.store(true, Ordering::SeqCst);
        let err = sync.refresh().await.unwrap_err();

        assert!(matches!(err, SyncError::Fetch(_)));
        assert_eq!(sync.state(), SyncState::FetchFailed);
        assert_eq!(sync.cache().len(), 1);
        assert_eq!(
            sync.presenter().errors,
            vec!["Error: Failed to fetch streets"]
        );
    }

    #[tokio::test]
    async fn test_filter_and_sort_leave_cache_alone() {
        let mut sync = controller(&["Zülpicher Str.", "Bonner Str.", "Aachener Str."]);
        sync.start().await.unwrap();
        let cached = sync.cache().to_vec();

        let rows = sync.filter("  STR ");
        assert_eq!(rows.len(), 3);

        let rows = sync.sort_ascending();
        assert_eq!(rows[0].address, "Aachener Str.");
        assert_eq!(rows[2].address, "Zülpicher Str.");

        let rows = sync.sort_descending();
        assert_eq!(rows[0].address, "Zülpicher Str.");

        let rows = sync.filter("bonn");
        assert_eq!(rows.len(), 1);

        assert_eq!(sync.cache(), cached.as_slice());
        assert_eq!(sync.filter("").len(), 3);
    }

    #[tokio::test]
    async fn test_sort_ignores_previous_filter() {
        let mut sync = controller(&["Zülpicher Str.", "Bonner Str.", "Aachener Str."]);
        sync.start().await.unwrap();

        assert_eq!(sync.filter("bonn").len(), 1);
        let rows = sync.sort_ascending();
        assert_eq!(rows.len(), 3);

        let rows = sync.filter("str");
        assert_eq!(rows[0].address, "Zülpicher Str.");
    }

    #[tokio::test]
    async fn test_successful_mutation_notifies_and_refetches() {
        let mut sync = controller(&[]);
        sync.start().await.unwrap();

        let confirmation = sync
            .mutate(Mutation::Create(input("Bonner Str. 98")))
            .await
            .unwrap();

        assert_eq!(confirmation.message, "Street added");
        assert!(confirmation.id.is_some());
        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.cache().len(), 1);
        assert_eq!(sync.presenter().notices, vec![SUCCESS_NOTICE]);
        assert_eq!(sync.api().list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_through_controller() {
        let mut sync = controller(&["Bonner Str. 98"]);
        sync.start().await.unwrap();
        let id = sync.cache()[0].id;

        sync.mutate(Mutation::Update(id, input("Bonner Str. 100")))
            .await
            .unwrap();
        assert_eq!(sync.cache()[0].address, "Bonner Str. 100");
        assert_eq!(sync.cache()[0].id, id);

        sync.mutate(Mutation::Delete(id)).await.unwrap();
        assert!(sync.cache().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_reports_and_keeps_cache() {
        let mut sync = controller(&["Bonner Str. 98"]);
        sync.start().await.unwrap();
        let cached = sync.cache().to_vec();

        sync.api().fail_writes.store(true, Ordering::SeqCst);
        let err = sync
            .mutate(Mutation::Create(input("Aachener Str. 1")))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Mutate(_)));
        assert_eq!(err.client_error().status(), Some(404));
        assert_eq!(sync.state(), SyncState::MutateFailed);
        assert_eq!(sync.cache(), cached.as_slice());
        assert_eq!(sync.presenter().errors, vec!["Error: Street not found"]);
        assert!(sync.presenter().notices.is_empty());
        assert_eq!(sync.api().list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_after_mutation_ends_in_fetch_failed() {
        let mut sync = controller(&[]);
        sync.start().await.unwrap();

        sync.api().fail_list.store(true, Ordering::SeqCst);
        let err = sync
            .mutate(Mutation::Create(input("Bonner Str. 98")))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Fetch(_)));
        assert_eq!(sync.state(), SyncState::FetchFailed);
        assert_eq!(sync.presenter().notices, vec![SUCCESS_NOTICE]);
        assert!(sync.cache().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_renders_full_cache_in_server_order() {
        let mut sync = controller(&["Bonner Str. 98", "Aachener Str. 1"]);
        sync.start().await.unwrap();
        sync.filter("aachen");
        sync.sort_ascending();

        sync.mutate(Mutation::Create(input("Chlodwigplatz 3")))
            .await
            .unwrap();

        let last = sync.presenter().renders.last().unwrap().clone();
        assert_eq!(
            last,
            vec!["Bonner Str. 98", "Aachener Str. 1", "Chlodwigplatz 3"]
        );
        assert_eq!(sync.cache().len(), 3);
    }
}
