use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::guard::{require_not_blocked, require_self};
use crate::middleware::AuthUser;
use crate::{AppState, blocking};
use darkroom_types::models::User;
use darkroom_types::validate;

/// PUT /users/{username}/following/{target} — follow `target`.
pub async fn follow_user(
    State(state): State<AppState>,
    Path((username, target)): Path<(String, String)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;
    if !validate::is_valid_username(&target) {
        return Err(ApiError::BadRequest("malformed username"));
    }

    blocking(move || state.db.follow(&username, &target)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{username}/following/{target} — unfollow. Idempotent.
pub async fn unfollow_user(
    State(state): State<AppState>,
    Path((username, target)): Path<(String, String)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;

    blocking(move || state.db.unfollow(&username, &target)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{username}/following — most recent follow first.
pub async fn list_following(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_not_blocked(&state, &auth.0, &username).await?;

    let names = blocking(move || state.db.list_following(&username)).await?;
    Ok(Json(into_users(names)))
}

/// GET /users/{username}/followers — most recent follower first.
pub async fn list_followers(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_not_blocked(&state, &auth.0, &username).await?;

    let names = blocking(move || state.db.list_followers(&username)).await?;
    Ok(Json(into_users(names)))
}

pub(crate) fn into_users(names: Vec<String>) -> Vec<User> {
    names.into_iter().map(|username| User { username }).collect()
}
