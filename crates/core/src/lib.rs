//! Tankstellen Core - Shared types library.
//!
//! This crate provides the types shared by every Tankstellen component:
//! - `server` - REST API over the street collection
//! - `client` - HTTP client and data-sync cache
//! - `cli` - Command-line tools for migrations, seeding and CRUD
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Street records, the validated [`StreetId`], and API messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
