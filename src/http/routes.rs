use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Interview control
        .route("/interviews/start", post(handlers::start_interview))
        .route(
            "/interviews/stop/:interview_id",
            post(handlers::stop_interview),
        )
        .route(
            "/interviews/:interview_id/mute",
            post(handlers::set_muted),
        )
        // Relay agent: events in, directive out
        .route(
            "/interviews/:interview_id/events",
            post(handlers::forward_agent_event),
        )
        .route(
            "/interviews/:interview_id/agent",
            get(handlers::get_agent_directive),
        )
        // Interview queries
        .route(
            "/interviews/:interview_id/status",
            get(handlers::get_interview_status),
        )
        .route(
            "/interviews/:interview_id/transcript",
            get(handlers::get_interview_transcript),
        )
        .route(
            "/interviews/:interview_id/report",
            get(handlers::get_interview_report),
        )
        // Browser clients call the relay endpoints cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
