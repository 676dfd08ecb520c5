//! Street collection handlers.
//!
//! Update and delete validate the path identifier before touching the
//! store, and decide between 404 and 500 from the store's reported match
//! or delete count.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use tankstellen_core::{ApiMessage, IdError, Street, StreetId, StreetInput};

use crate::error::{AppError, Result};
use crate::state::AppState;

const RESOURCE: &str = "Street";

/// Unwrap a JSON body, turning extractor rejections into a JSON 400.
fn body(payload: std::result::Result<Json<StreetInput>, JsonRejection>) -> Result<StreetInput> {
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    input.validate()?;
    Ok(input)
}

/// Parse the path identifier. Segments that do not even decode are
/// reported like any other malformed identifier.
fn street_id(path: std::result::Result<Path<String>, PathRejection>) -> Result<StreetId> {
    let Path(raw) =
        path.map_err(|rejection| AppError::InvalidId(IdError::Malformed(rejection.body_text())))?;
    Ok(StreetId::parse(&raw)?)
}

/// List every street in store order.
///
/// # Errors
///
/// Returns `AppError::Persistence` if the store fails.
pub async fn list_streets(State(state): State<AppState>) -> Result<Json<Vec<Street>>> {
    let streets = state
        .store()
        .list()
        .await
        .map_err(|e| AppError::persistence("Failed to fetch streets", e))?;

    tracing::debug!(count = streets.len(), "Listed streets");
    Ok(Json(streets))
}

/// Create a street; the store assigns its identifier.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a malformed body or blank address,
/// `AppError::Persistence` if the store fails.
pub async fn create_street(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StreetInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiMessage>)> {
    let input = body(payload)?;

    let id = state
        .store()
        .insert(&input)
        .await
        .map_err(|e| AppError::persistence("Failed to create street", e))?;

    tracing::info!(street_id = %id, "Street added");
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::new("Street added").with_id(id)),
    ))
}

/// Replace the address and coordinates of a street.
///
/// # Errors
///
/// Returns `AppError::InvalidId` before any store call if the identifier is
/// malformed, `AppError::BadRequest` for a malformed body,
/// `AppError::NotFound` if nothing matched, `AppError::Persistence` if the
/// store fails.
pub async fn update_street(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
    payload: std::result::Result<Json<StreetInput>, JsonRejection>,
) -> Result<Json<ApiMessage>> {
    let id = street_id(path)?;
    let input = body(payload)?;

    let matched = state
        .store()
        .replace(id, &input)
        .await
        .map_err(|e| AppError::persistence("Failed to update street", e))?;

    if matched.is_zero() {
        return Err(AppError::NotFound(RESOURCE.to_owned()));
    }

    tracing::info!(street_id = %id, "Street updated");
    Ok(Json(ApiMessage::new("Street updated")))
}

/// Delete a street.
///
/// # Errors
///
/// Returns `AppError::InvalidId` before any store call if the identifier is
/// malformed, `AppError::NotFound` if nothing matched,
/// `AppError::Persistence` if the store fails.
pub async fn delete_street(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<ApiMessage>> {
    let id = street_id(path)?;

    let deleted = state
        .store()
        .remove(id)
        .await
        .map_err(|e| AppError::persistence("Failed to delete street", e))?;

    if deleted.is_zero() {
        return Err(AppError::NotFound(RESOURCE.to_owned()));
    }

    tracing::info!(street_id = %id, "Street deleted");
    Ok(Json(ApiMessage::new("Street deleted")))
}
