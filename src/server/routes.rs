//! Router definition for the relay

use axum::{extract::DefaultBodyLimit, routing::*, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::handlers;
use super::state::AppState;

/// Create the relay router.
///
/// The static front-end (participant page at `/`, `owner.html`) is only
/// mounted when the configured public dir exists.
pub fn create_router(state: &AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    let mut router = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/create-session", get(handlers::create_session))
        .route(
            "/upload/:session_id",
            post(handlers::upload_clip).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/owner/files/:session_id", get(handlers::list_files))
        .route(
            "/uploads/:session_id/:filename",
            get(handlers::retrieve_file),
        )
        .with_state(state.clone());

    if let Some(public_dir) = state.config.public_dir.as_ref().filter(|dir| dir.is_dir()) {
        tracing::debug!(dir = %public_dir.display(), "Serving static front-end");
        router = router.fallback_service(ServeDir::new(public_dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
