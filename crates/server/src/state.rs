//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::StreetStore;

/// Application state shared across all handlers.
///
/// Holds the store connection opened once at startup. This struct is
/// cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn StreetStore>,
}

impl AppState {
    /// Create a new application state around a street store.
    #[must_use]
    pub fn new(store: Arc<dyn StreetStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the street store.
    #[must_use]
    pub fn store(&self) -> &dyn StreetStore {
        self.inner.store.as_ref()
    }
}
