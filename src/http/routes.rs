use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/sessions/start", post(handlers::start_session))
        .route("/sessions/stop", post(handlers::stop_session))
        .route("/sessions/pause", post(handlers::pause_session))
        .route("/sessions/resume", post(handlers::resume_session))
        .route("/sessions/retry", post(handlers::retry_transcription))
        .route("/sessions/status", get(handlers::session_status))
        // Playback control
        .route("/playback/start", post(handlers::start_playback))
        .route("/playback/stop", post(handlers::stop_playback))
        // Meeting queries
        .route("/meetings", get(handlers::list_meetings))
        .route(
            "/meetings/:meeting_id",
            get(handlers::get_meeting).delete(handlers::delete_meeting),
        )
        .route(
            "/meetings/:meeting_id/items/:item_id/highlight",
            post(handlers::toggle_highlight),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
