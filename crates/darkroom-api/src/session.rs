use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::error::ApiError;
use crate::{AppState, blocking};
use darkroom_types::api::{LoginRequest, LoginResponse};
use darkroom_types::validate;

/// POST /session — resolve a username to its opaque identifier, creating the
/// identity on first contact. The identifier doubles as the bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !validate::is_valid_username(&req.name) {
        return Err(ApiError::BadRequest("malformed username"));
    }

    let name = req.name;
    let token = blocking(move || state.db.login(&name)).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse { identifier: token }),
    ))
}
