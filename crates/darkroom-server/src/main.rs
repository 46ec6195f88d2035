use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use darkroom_api::middleware::require_auth;
use darkroom_api::storage::Storage;
use darkroom_api::{AppState, AppStateInner, bans, comments, follows, likes, photos, profile, session, stream};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "darkroom=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("DARKROOM_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("DARKROOM_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let db_path: PathBuf = std::env::var("DARKROOM_DB_PATH")
        .unwrap_or_else(|_| "darkroom.db".into())
        .into();
    let storage_dir: PathBuf = std::env::var("DARKROOM_STORAGE_DIR")
        .unwrap_or_else(|_| "./photo-storage".into())
        .into();

    // Init database and blob storage
    let db = darkroom_db::Database::open(&db_path)?;
    let storage = Storage::new(storage_dir).await?;

    let state: AppState = Arc::new(AppStateInner { db, storage });

    // Routes
    let public_routes = Router::new()
        .route("/session", post(session::login))
        .route("/health", get(health))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users/{username}/username", put(profile::rename))
        .route("/users/{username}/profile", get(profile::get_profile))
        .route("/users/{username}/following/{target}", put(follows::follow_user))
        .route("/users/{username}/following/{target}", delete(follows::unfollow_user))
        .route("/users/{username}/following", get(follows::list_following))
        .route("/users/{username}/followers", get(follows::list_followers))
        .route("/users/{username}/banned/{target}", put(bans::ban_user))
        .route("/users/{username}/banned/{target}", delete(bans::unban_user))
        .route("/users/{username}/banned", get(bans::list_banned))
        .route("/photos", post(photos::upload_photo))
        .route("/photos/{photo_id}", delete(photos::delete_photo))
        .route("/photos/{photo_id}/image", get(photos::get_image))
        .route("/photos/{photo_id}/likes/{username}", put(likes::like_photo))
        .route("/photos/{photo_id}/likes/{username}", delete(likes::unlike_photo))
        .route("/photos/{photo_id}/likes", get(likes::list_likes))
        .route("/photos/{photo_id}/comments", post(comments::post_comment))
        .route("/photos/{photo_id}/comments/{comment_id}", delete(comments::delete_comment))
        .route("/photos/{photo_id}/comments", get(comments::list_comments))
        .route("/stream", get(stream::get_stream))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024)) // photo uploads
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Darkroom server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
