//! JSON confirmation and error bodies.

use serde::{Deserialize, Serialize};

use super::id::StreetId;

/// Body returned by every write operation and by every error response.
///
/// `error` carries a short machine-facing detail for client errors; it is
/// never populated with store internals. `id` is set when a record was
/// created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StreetId>,
}

impl ApiMessage {
    /// A plain message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            id: None,
        }
    }

    /// Attach an error detail.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attach the identifier of a created record.
    #[must_use]
    pub const fn with_id(mut self, id: StreetId) -> Self {
        self.id = Some(id);
        self
    }
}
