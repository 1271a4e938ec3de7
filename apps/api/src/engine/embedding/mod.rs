//! Sentence embedding backends.
//!
//! An `Embedder` is built once at start-up and shared read-only across
//! requests as `Arc<dyn Embedder>`. Each text is encoded independently of any
//! other text in the batch, which is what makes embedding-based similarity
//! comparable across requests.

use std::{fmt, str};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod hash;
pub mod http;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Embedding service returned no vectors")]
    EmptyResponse,

    #[error("Expected {expected} vectors, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Expected dimension {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend name ("hash", "http") for logs and responses.
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Encodes a batch, preserving input order. Backends that can batch
    /// remotely override this.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Deterministic feature hashing, no model download. Lexical only:
    /// an offline and test stand-in, not a sentence model.
    Hash,
    /// OpenAI-compatible `/embeddings` endpoint serving a pretrained model.
    #[default]
    Http,
}

impl EmbeddingBackend {
    /// True when vectors come from a pretrained sentence model.
    pub fn is_semantic(self) -> bool {
        matches!(self, Self::Http)
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl str::FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "http" | "remote" => Ok(Self::Http),
            _ => Err(format!(
                "unknown embedding backend '{s}', expected one of: hash, http"
            )),
        }
    }
}

/// Cosine similarity in [-1, 1]. Zero vectors and mismatched lengths score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
