/// API route modules
pub mod generate;
pub mod health;
pub mod music_search;
pub mod upload;

use crate::services::file_storage::UPLOADS_ROUTE;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Multipart framing allowance on top of the photo size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/music-search", post(music_search::music_search))
        .route("/:feature", post(generate::generate));

    let upload_limit = app_state.file_storage.max_bytes() + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(app_state.file_storage.base_path());
    let public = ServeDir::new(&app_state.public_dir);

    Router::new()
        .nest("/api", api_routes)
        .route(
            "/upload",
            post(upload::upload_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest_service(UPLOADS_ROUTE, uploads)
        .fallback_service(public)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
