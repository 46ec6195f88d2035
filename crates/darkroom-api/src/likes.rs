use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::follows::into_users;
use crate::guard::{require_not_blocked, require_self};
use crate::middleware::AuthUser;
use crate::photos::lookup_author;
use crate::{AppState, blocking};

/// PUT /photos/{photo_id}/likes/{username} — like a photo. Idempotent.
pub async fn like_photo(
    State(state): State<AppState>,
    Path((photo_id, username)): Path<(Uuid, String)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;

    let id = photo_id.to_string();
    blocking(move || state.db.like_photo(&id, &username)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /photos/{photo_id}/likes/{username} — remove a like. Idempotent.
pub async fn unlike_photo(
    State(state): State<AppState>,
    Path((photo_id, username)): Path<(Uuid, String)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_self(&auth, &username)?;

    let id = photo_id.to_string();
    blocking(move || state.db.unlike_photo(&id, &username)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /photos/{photo_id}/likes — who liked this photo, newest first.
pub async fn list_likes(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let author = lookup_author(&state, photo_id).await?;
    require_not_blocked(&state, &auth.0, &author).await?;

    let id = photo_id.to_string();
    let names = blocking(move || state.db.list_likes(&id)).await?;
    Ok(Json(into_users(names)))
}
