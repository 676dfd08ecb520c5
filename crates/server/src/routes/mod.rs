//! HTTP route handlers for the street API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                 - Liveness text
//! GET    /health           - Health check
//! GET    /health/ready     - Readiness (store ping)
//!
//! # Streets
//! GET    /streets          - List all streets
//! POST   /streets          - Create a street
//! PUT    /streets/{id}     - Replace a street
//! DELETE /streets/{id}     - Delete a street
//! ```

pub mod health;
pub mod streets;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the street collection router.
pub fn street_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/streets",
            get(streets::list_streets).post(streets::create_street),
        )
        .route(
            "/streets/{id}",
            axum::routing::put(streets::update_street).delete(streets::delete_street),
        )
}

/// Create the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(street_routes())
}
