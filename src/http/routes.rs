use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Proposal card
        .route("/card", get(handlers::get_card))
        .route("/card/no", post(handlers::tease_no_button))
        .route("/card/yes", post(handlers::accept_proposal))
        // Voice recorder lifecycle
        .route("/recorder", get(handlers::get_recorder))
        .route("/recorder/start", post(handlers::start_recording))
        .route("/recorder/stop", post(handlers::stop_recording))
        .route("/recorder/retry", post(handlers::retry_recording))
        .route("/recorder/send", post(handlers::send_recording))
        .route("/recorder/preview", get(handlers::get_preview))
        // Direct artifact upload
        .route("/api/upload-audio", post(handlers::upload_audio))
        // Request logging + cross-origin access for the page
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
