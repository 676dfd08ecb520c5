//! Integration tests for Tankstellen Streets.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process server, in-memory store
//! cargo test -p tankstellen-integration-tests
//!
//! # Also run the PostgreSQL-backed tests
//! STREETS_DATABASE_URL=postgres://... cargo test -p tankstellen-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `streets_api` - REST contract over HTTP
//! - `client_sync` - `StreetsClient` and `StreetSync` against a live server
//! - `postgres_store` - The `PostgreSQL` store adapter (ignored by default)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use tankstellen_server::build_router;
use tankstellen_server::db::{InMemoryStreetStore, StreetStore};
use tankstellen_server::state::AppState;

/// A street API server running on an ephemeral local port.
///
/// The server task is aborted when the value is dropped.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns error if no local port can be bound.
    pub async fn spawn() -> std::io::Result<(Self, Arc<InMemoryStreetStore>)> {
        let store = Arc::new(InMemoryStreetStore::new());
        let server = Self::spawn_with_store(store.clone()).await?;
        Ok((server, store))
    }

    /// Start a server over the given store.
    ///
    /// # Errors
    ///
    /// Returns error if no local port can be bound.
    pub async fn spawn_with_store(store: Arc<dyn StreetStore>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = build_router(AppState::new(store));

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                report_server_error(&e);
            }
        });

        Ok(Self { addr, handle })
    }

    /// Base URL of the running server, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for a path such as `/streets`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[allow(clippy::print_stderr)]
fn report_server_error(e: &std::io::Error) {
    eprintln!("test server stopped: {e}");
}
