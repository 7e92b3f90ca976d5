pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::interview::handlers;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route("/api/v1/filters", get(handlers::handle_list_filters))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/start", post(handlers::handle_start))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/session/questions",
            get(handlers::handle_list_questions),
        )
        .fallback(not_found)
        .with_state(state)
}
