//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::book::{Book, UpdateBook},
    AppState,
};

use super::AuthenticatedUser;

/// Paginated response wrapper
#[derive(Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Deserialize)]
pub struct ListBooksParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// List catalog books with pagination
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(params): Query<ListBooksParams>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    let (items, total) = state.services.catalog.list_books(page, per_page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get a book by ISBN
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&isbn).await?;
    Ok(Json(book))
}

/// Create a book from manually entered data (admin only)
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<Book>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_admin()?;

    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book's mutable fields (admin only)
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let updated = state.services.catalog.update_book(&isbn, update).await?;
    Ok(Json(updated))
}

/// Delete a book from the catalog (admin only)
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_book(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct AcquireRequest {
    pub isbn: String,
}

/// Acquire a book record from the OPAC by ISBN.
///
/// Returns 200 with the stored record when the ISBN is already cataloged,
/// 201 when the pipeline fetched and created it.
pub async fn acquire_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(payload): Json<AcquireRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let acquired = state.services.acquisition.acquire(&payload.isbn).await?;
    let status = if acquired.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(acquired.book)))
}
