use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::engine::history::ScoringHistoryContext;
use crate::engine::ranker::Ranker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup; read-only afterwards.
    pub ranker: Arc<Ranker>,
    /// Requests snapshot it before scoring and append once scoring completes.
    pub history: Arc<Mutex<ScoringHistoryContext>>,
}
