use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::guard::require_not_blocked;
use crate::middleware::AuthUser;
use crate::{AppState, blocking, parse_created_at};
use darkroom_db::models::PhotoRow;
use darkroom_types::api::UploadPhotoResponse;
use darkroom_types::models::Photo;

/// 20 MB upload limit for photos.
const MAX_PHOTO_SIZE: usize = 20 * 1024 * 1024;

/// POST /photos — accepts raw image bytes, saves the blob to disk and
/// records the post.
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    bytes: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("empty photo upload"));
    }
    if bytes.len() > MAX_PHOTO_SIZE {
        return Err(ApiError::BadRequest("photo exceeds the size limit"));
    }

    let photo_id = Uuid::new_v4();
    let size = bytes.len() as u64;

    state
        .storage
        .write_blob(&photo_id, &bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write blob for photo {}: {}", photo_id, e);
            ApiError::Internal
        })?;

    let db = state.clone();
    let id = photo_id.to_string();
    let author = auth.0.clone();
    let inserted = blocking(move || db.db.insert_photo(&id, &author)).await;

    if let Err(e) = inserted {
        // Don't leave an orphaned blob behind a failed insert.
        if let Err(cleanup) = state.storage.delete_blob(&photo_id).await {
            warn!("Failed to clean up blob for photo {}: {}", photo_id, cleanup);
        }
        return Err(e);
    }

    Ok((
        StatusCode::CREATED,
        Json(UploadPhotoResponse { photo_id, size }),
    ))
}

/// GET /photos/{photo_id}/image — serve the stored blob.
pub async fn get_image(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let author = lookup_author(&state, photo_id).await?;
    require_not_blocked(&state, &auth.0, &author).await?;

    let bytes = state.storage.read_blob(&photo_id).await.map_err(|e| {
        warn!("Blob missing for photo {}: {}", photo_id, e);
        ApiError::NotFound
    })?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}

/// DELETE /photos/{photo_id} — remove one's own photo. Likes and comments on
/// it are dropped with the row.
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let author = lookup_author(&state, photo_id).await?;
    if author != auth.0 {
        return Err(ApiError::Forbidden("you can only delete your own photos"));
    }

    let db = state.clone();
    let id = photo_id.to_string();
    blocking(move || db.db.delete_photo(&id)).await?;

    if let Err(e) = state.storage.delete_blob(&photo_id).await {
        warn!("Failed to delete blob for photo {}: {}", photo_id, e);
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn lookup_author(state: &AppState, photo_id: Uuid) -> Result<String, ApiError> {
    let db = state.clone();
    let id = photo_id.to_string();
    blocking(move || db.db.photo_author(&id))
        .await?
        .ok_or(ApiError::NotFound)
}

pub(crate) fn photo_to_api(row: PhotoRow) -> Photo {
    Photo {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt photo id '{}': {}", row.id, e);
            Uuid::default()
        }),
        created_at: parse_created_at(&row.created_at, &format!("photo {}", row.id)),
        author: row.author,
        likes: row.likes,
        comments: row.comments,
    }
}
