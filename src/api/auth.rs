//! Authentication endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, User},
    AppState,
};

use super::AuthenticatedUser;

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// Get the authenticated user's own account
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(claims.user_id).await?;
    Ok(Json(user))
}
