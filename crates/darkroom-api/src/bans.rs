use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::follows::into_users;
use crate::guard::require_self;
use crate::middleware::AuthUser;
use crate::{AppState, blocking};
use darkroom_types::validate;

/// PUT /users/{username}/banned/{target} — ban `target`. The store severs
/// every follow, like and comment between the pair in the same transaction.
pub async fn ban_user(
    State(state): State<AppState>,
    Path((username, target)): Path<(String, String)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;
    if !validate::is_valid_username(&target) {
        return Err(ApiError::BadRequest("malformed username"));
    }

    blocking(move || state.db.ban(&username, &target)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{username}/banned/{target} — lift a ban. Idempotent; never
/// restores relationships the ban severed.
pub async fn unban_user(
    State(state): State<AppState>,
    Path((username, target)): Path<(String, String)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;

    blocking(move || state.db.unban(&username, &target)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{username}/banned — the caller's own ban list, newest first.
pub async fn list_banned(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;

    let names = blocking(move || state.db.list_banned(&username)).await?;
    Ok(Json(into_users(names)))
}
