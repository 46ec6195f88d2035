pub mod bans;
pub mod comments;
pub mod error;
pub mod follows;
pub mod guard;
pub mod likes;
pub mod middleware;
pub mod photos;
pub mod profile;
pub mod session;
pub mod storage;
pub mod stream;

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, warn};

use crate::error::ApiError;
use crate::storage::Storage;
use darkroom_db::{Database, StoreResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub storage: Storage,
}

/// Run a store call off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

/// SQLite stores timestamps as `YYYY-MM-DD HH:MM:SS` without a timezone.
/// Parse as naive UTC, falling back through RFC 3339 for safety.
pub(crate) fn parse_created_at(raw: &str, context: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {}: {}", raw, context, e);
            DateTime::default()
        })
}
