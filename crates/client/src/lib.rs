//! Tankstellen Streets client library.
//!
//! Talks to the street REST API and keeps the last full listing in memory.
//!
//! # Data flow
//!
//! ```text
//! refresh ─▶ cache ─▶ filter/sort ─▶ Presenter::render
//! mutate  ─▶ API   ─▶ refresh (on success) | Presenter::report_error (on failure)
//! ```
//!
//! # Modules
//!
//! - [`api`] - [`StreetApi`] trait and the `reqwest`-backed [`StreetsClient`]
//! - [`view`] - Pure filter and sort derivations over a record slice
//! - [`presenter`] - The presentation sink the controller pushes into
//! - [`sync`] - [`StreetSync`], the cache owner and its state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod presenter;
pub mod sync;
pub mod view;

pub use api::{StreetApi, StreetsClient};
pub use error::ClientError;
pub use presenter::Presenter;
pub use sync::{Mutation, StreetSync, SyncError, SyncState};
pub use view::SortOrder;
