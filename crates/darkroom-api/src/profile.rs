use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::guard::{require_not_blocked, require_self};
use crate::middleware::AuthUser;
use crate::photos::photo_to_api;
use crate::{AppState, blocking};
use darkroom_types::api::{ProfileResponse, RenameRequest};
use darkroom_types::validate;

/// PUT /users/{username}/username — rename the caller's own identity.
/// The opaque id and every graph edge survive the rename.
pub async fn rename(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<RenameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;
    if !validate::is_valid_username(&req.name) {
        return Err(ApiError::BadRequest("malformed username"));
    }

    let new_name = req.name;
    blocking(move || state.db.rename_user(&username, &new_name)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{username}/profile — the user's photos plus follower counts.
/// Rejected across a blocked pair.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let exists = {
        let db = state.clone();
        let name = username.clone();
        blocking(move || db.db.user_exists(&name)).await?
    };
    if !exists {
        return Err(ApiError::NotFound);
    }

    require_not_blocked(&state, &auth.0, &username).await?;

    let db = state.clone();
    let name = username.clone();
    let (photos, followers, following) = blocking(move || {
        let photos = db.db.list_photos_by(&name)?;
        let followers = db.db.count_followers(&name)?;
        let following = db.db.count_following(&name)?;
        Ok((photos, followers, following))
    })
    .await?;

    Ok(Json(ProfileResponse {
        username,
        photos: photos.into_iter().map(photo_to_api).collect(),
        followers,
        following,
    }))
}
