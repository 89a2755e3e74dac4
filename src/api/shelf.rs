//! Personal bookshelf endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::shelf::ShelfBook,
    AppState,
};

use super::AuthenticatedUser;

/// List the authenticated user's shelf
pub async fn list_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ShelfBook>>> {
    let books = state.services.shelf.list(claims.user_id).await?;
    Ok(Json(books))
}

#[derive(Deserialize)]
pub struct ShelveRequest {
    pub isbn: String,
}

/// Add a book to the authenticated user's shelf by ISBN.
///
/// Unknown ISBNs are acquired from the OPAC before shelving.
pub async fn add_to_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<ShelveRequest>,
) -> AppResult<(StatusCode, Json<ShelfBook>)> {
    let shelved = state.services.shelf.add(claims.user_id, &payload.isbn).await?;
    Ok((StatusCode::CREATED, Json(shelved)))
}

/// Remove a book from the authenticated user's shelf
pub async fn remove_from_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state.services.shelf.remove(claims.user_id, &isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}
