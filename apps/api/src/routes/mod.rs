pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_start))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_reset),
        )
        .route(
            "/api/v1/sessions/:id/question",
            post(handlers::handle_next_question),
        )
        .route("/api/v1/sessions/:id/skip", post(handlers::handle_skip))
        .route("/api/v1/sessions/:id/answer", post(handlers::handle_submit))
        .route(
            "/api/v1/sessions/:id/summary",
            get(handlers::handle_summary),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
