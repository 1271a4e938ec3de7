use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and active scoring setup.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener-api",
        "similarity": state.ranker.similarity_label(),
        "comparable_across_requests": state.ranker.scores_comparable_across_requests(),
        "tables_version": state.ranker.tables_version(),
        "history_capacity": state.config.history_capacity,
    }))
}
