use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::photos::photo_to_api;
use crate::{AppState, blocking};
use darkroom_types::models::Photo;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// GET /stream — photos from the users the caller follows, newest first.
/// Plain recency order; there is no ranking.
pub async fn get_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.min(200);

    let rows = blocking(move || state.db.stream_for(&auth.0, limit)).await?;
    let photos: Vec<Photo> = rows.into_iter().map(photo_to_api).collect();
    Ok(Json(photos))
}
