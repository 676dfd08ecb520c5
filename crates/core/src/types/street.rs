//! Street records and request bodies.

use serde::{Deserialize, Serialize};

use super::id::StreetId;

/// Errors that can occur when validating a [`StreetInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The address is missing or blank.
    #[error("address is required")]
    MissingAddress,
}

/// Geographic position of a street.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    /// Create coordinates from a longitude/latitude pair.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A persisted street record.
///
/// `coordinates` is omitted from JSON when absent rather than written as
/// zeros or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Street {
    pub id: StreetId,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Body of a create or update request.
///
/// Updates replace both fields wholesale; the record identifier comes from
/// the path and is never taken from the body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreetInput {
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl StreetInput {
    /// Build a validated input.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingAddress`] if the address is blank.
    pub fn new(
        address: impl Into<String>,
        coordinates: Option<Coordinates>,
    ) -> Result<Self, InputError> {
        let input = Self {
            address: address.into(),
            coordinates,
        };
        input.validate()?;
        Ok(input)
    }

    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingAddress`] if the address is blank.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.address.trim().is_empty() {
            return Err(InputError::MissingAddress);
        }
        Ok(())
    }

    /// Attach a store-assigned identifier.
    #[must_use]
    pub fn into_street(self, id: StreetId) -> Street {
        Street {
            id,
            address: self.address,
            coordinates: self.coordinates,
        }
    }
}
