use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::guard::require_not_blocked;
use crate::middleware::AuthUser;
use crate::photos::lookup_author;
use crate::{AppState, blocking, parse_created_at};
use darkroom_db::models::CommentRow;
use darkroom_types::api::PostCommentRequest;
use darkroom_types::models::Comment;

/// POST /photos/{photo_id}/comments — comment on a photo.
pub async fn post_comment(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<PostCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !darkroom_types::validate::is_valid_comment(&req.comment) {
        return Err(ApiError::BadRequest("malformed comment"));
    }

    let comment_id = Uuid::new_v4();
    let db = state.clone();
    let id = comment_id.to_string();
    let post = photo_id.to_string();
    let author = auth.0.clone();
    let row = blocking(move || db.db.add_comment(&id, &post, &author, &req.comment)).await?;

    Ok((StatusCode::CREATED, Json(comment_to_api(row))))
}

/// DELETE /photos/{photo_id}/comments/{comment_id} — the comment's author or
/// the photo's owner may delete.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((photo_id, comment_id)): Path<(Uuid, Uuid)>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = lookup_author(&state, photo_id).await?;

    let db = state.clone();
    let id = comment_id.to_string();
    let comment = blocking(move || db.db.get_comment(&id))
        .await?
        .ok_or(ApiError::NotFound)?;
    if comment.post_id != photo_id.to_string() {
        return Err(ApiError::NotFound);
    }
    if comment.author != auth.0 && owner != auth.0 {
        return Err(ApiError::Forbidden(
            "only the comment's author or the photo's owner may delete it",
        ));
    }

    let id = comment_id.to_string();
    blocking(move || state.db.delete_comment(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /photos/{photo_id}/comments — conversation order, oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let author = lookup_author(&state, photo_id).await?;
    require_not_blocked(&state, &auth.0, &author).await?;

    let id = photo_id.to_string();
    let rows = blocking(move || state.db.list_comments(&id)).await?;
    let comments: Vec<Comment> = rows.into_iter().map(comment_to_api).collect();
    Ok(Json(comments))
}

fn comment_to_api(row: CommentRow) -> Comment {
    Comment {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt comment id '{}': {}", row.id, e);
            Uuid::default()
        }),
        photo_id: row.post_id.parse().unwrap_or_else(|e| {
            warn!("Corrupt post_id '{}' on comment '{}': {}", row.post_id, row.id, e);
            Uuid::default()
        }),
        created_at: parse_created_at(&row.created_at, &format!("comment {}", row.id)),
        author: row.author,
        body: row.body,
    }
}
