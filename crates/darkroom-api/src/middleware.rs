use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::ApiError;
use darkroom_db::StoreError;
use darkroom_types::validate;

/// The authenticated caller, inserted as a request extension by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Resolve the bearer token to an identity.
///
/// The token is the user's permanent opaque id; there is no expiry or
/// revocation (a known limitation of the session model, kept deliberately).
/// The shape check runs before the store lookup.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    if !validate::is_valid_token(token) {
        return Err(ApiError::Unauthorized);
    }

    let token = token.to_string();
    let db = state.clone();
    let username = tokio::task::spawn_blocking(move || db.db.resolve_token(&token))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::Unauthorized,
            other => other.into(),
        })?;

    req.extensions_mut().insert(AuthUser(username));
    Ok(next.run(req).await)
}
