//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::user::{CreateUser, Role, User},
    AppState,
};

use super::AuthenticatedUser;

/// List all user accounts (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;

    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Register a new user account
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.users.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user account by id (admin only)
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;

    let user = state.services.users.get_user(id).await?;
    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Change a user's role (admin only)
pub async fn update_role(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;

    let user = state.services.users.update_role(id, payload.role).await?;
    Ok(Json(user))
}

/// Delete a user account (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
