pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::engine::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ranking API
        .route("/api/v1/rank", post(handlers::handle_rank))
        .route("/api/v1/jd/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/history",
            get(handlers::handle_history).delete(handlers::handle_clear_history),
        )
        .with_state(state)
}
