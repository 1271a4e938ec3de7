mod config;
mod engine;
mod errors;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::engine::embedding::{Embedder, EmbeddingBackend, HashEmbedder, HttpEmbedder};
use crate::engine::history::ScoringHistoryContext;
use crate::engine::ranker::Ranker;
use crate::engine::similarity::{SimilarityEngine, SimilarityStrategy};
use crate::engine::tables::ScoringTables;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Scoring tables: compiled-in defaults unless a file is configured
    let tables = match &config.scoring_tables_path {
        Some(path) => {
            let tables = ScoringTables::load(path)?;
            info!("Scoring tables v{} loaded from {}", tables.version, path.display());
            tables
        }
        None => ScoringTables::default(),
    };

    // Initialize similarity engine
    let similarity = match config.similarity_strategy {
        SimilarityStrategy::EmbeddingCosine => {
            SimilarityEngine::EmbeddingCosine(build_embedder(&config).await?)
        }
        SimilarityStrategy::CorpusRelativeLexical => SimilarityEngine::CorpusRelativeLexical,
    };

    let ranker = Ranker::new(tables, similarity, config.ranker_options())?;
    let history = ScoringHistoryContext::new(config.history_capacity);
    info!(
        "Scoring history capacity: {} records (reference year {})",
        history.capacity(),
        config.reference_year
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        ranker: Arc::new(ranker),
        history: Arc::new(Mutex::new(history)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the embedder selected by `EMBEDDING_BACKEND`. The http backend
/// is probed here so an unreachable model stops startup.
async fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    if !config.embedding_backend.is_semantic() {
        warn!(
            "EMBEDDING_BACKEND={} scores word overlap only; semantic similarity needs the http backend",
            config.embedding_backend
        );
    }

    let embedder: Arc<dyn Embedder> = match config.embedding_backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(config.embedding_dimension)),
        EmbeddingBackend::Http => {
            let url = config
                .embedding_api_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("EMBEDDING_API_URL is required for the http backend"))?;
            Arc::new(
                HttpEmbedder::connect(url, &config.embedding_model, config.embedding_api_key.clone())
                    .await?,
            )
        }
    };
    info!(
        "Embedder initialized (backend: {}, dimension: {})",
        embedder.name(),
        embedder.dimension()
    );
    Ok(embedder)
}
