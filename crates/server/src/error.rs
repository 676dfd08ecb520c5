//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures persistence errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error response carries a JSON
//! [`ApiMessage`] body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use tankstellen_core::{ApiMessage, IdError, InputError};

use crate::db::RepositoryError;

/// Application-level error type for the street API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The path identifier failed syntax validation.
    #[error("Invalid ID format: {0}")]
    InvalidId(#[from] IdError),

    /// The request body is malformed or incomplete.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The identifier is well-formed but matched no record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store failed while serving the request.
    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    /// Wrap a store failure with the operation it interrupted.
    #[must_use]
    pub const fn persistence(context: &'static str, source: RepositoryError) -> Self {
        Self::Persistence { context, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Persistence { context, source } = &self {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %source,
                sentry_event_id = %event_id,
                "{context}"
            );
        }

        // Don't expose internal error details to clients
        let body = match &self {
            Self::InvalidId(err) => ApiMessage::new("Invalid ID format").with_error(err.to_string()),
            Self::BadRequest(detail) => ApiMessage::new("Invalid request body").with_error(detail),
            Self::NotFound(what) => ApiMessage::new(format!("{what} not found")),
            Self::Persistence { context, .. } => ApiMessage::new(*context),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
