//! Core types for Tankstellen.
//!
//! This module provides type-safe wrappers for the street domain.

pub mod id;
pub mod message;
pub mod street;

pub use id::{IdError, StreetId};
pub use message::ApiMessage;
pub use street::{Coordinates, InputError, Street, StreetInput};
