//! Authorization checks shared across handlers.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::{AppState, blocking};

/// Reject callers acting on behalf of another identity.
pub fn require_self(auth: &AuthUser, path_username: &str) -> Result<(), ApiError> {
    if auth.0 != path_username {
        return Err(ApiError::Forbidden("you can only act on your own account"));
    }
    Ok(())
}

/// Reject reads across a blocked pair.
///
/// Mutations (follow, like, comment) re-check this inside their store
/// transaction. This guard covers read paths, which have no write
/// transaction.
pub async fn require_not_blocked(state: &AppState, a: &str, b: &str) -> Result<(), ApiError> {
    if a == b {
        return Ok(());
    }
    let db = state.clone();
    let (a, b) = (a.to_string(), b.to_string());
    let blocked = blocking(move || db.db.is_blocked(&a, &b)).await?;
    if blocked {
        return Err(ApiError::Forbidden(
            "interaction between these users is blocked",
        ));
    }
    Ok(())
}
