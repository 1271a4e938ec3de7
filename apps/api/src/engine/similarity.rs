//! Job-to-candidate relatedness, one score per candidate.
//!
//! Two strategies with different comparability guarantees:
//!
//! - `EmbeddingCosine` encodes every text on its own, so the score for a given
//!   (job, candidate) pair is the same whichever other candidates share the
//!   request. Scores are comparable across requests.
//! - `CorpusRelativeLexical` fits TF-IDF over `[job] + candidates`. IDF depends
//!   on the whole batch, so adding or removing a candidate can move everyone
//!   else's score. Scores are only comparable within one request.

use std::sync::Arc;
use std::{fmt, str};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::embedding::{cosine_similarity, Embedder};
use crate::engine::tfidf::TfIdfBuilder;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityStrategy {
    #[default]
    EmbeddingCosine,
    CorpusRelativeLexical,
}

impl fmt::Display for SimilarityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmbeddingCosine => write!(f, "embedding"),
            Self::CorpusRelativeLexical => write!(f, "lexical"),
        }
    }
}

impl str::FromStr for SimilarityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embedding" | "embedding_cosine" | "semantic" => Ok(Self::EmbeddingCosine),
            "lexical" | "tfidf" | "tf-idf" | "corpus_relative_lexical" => {
                Ok(Self::CorpusRelativeLexical)
            }
            _ => Err(format!(
                "unknown similarity strategy '{s}', expected one of: embedding, lexical"
            )),
        }
    }
}

pub enum SimilarityEngine {
    EmbeddingCosine(Arc<dyn Embedder>),
    CorpusRelativeLexical,
}

impl SimilarityEngine {
    /// Human-readable label, e.g. `embedding:hash` or `lexical:tfidf`.
    pub fn describe(&self) -> String {
        match self {
            Self::EmbeddingCosine(embedder) => format!("embedding:{}", embedder.name()),
            Self::CorpusRelativeLexical => "lexical:tfidf".to_string(),
        }
    }

    /// Whether a pair's score is independent of the rest of the batch.
    pub fn comparable_across_requests(&self) -> bool {
        matches!(self, Self::EmbeddingCosine(_))
    }

    /// Scores each candidate against the job text, in input order.
    ///
    /// Any failure fails the whole batch; there are no partial scores.
    pub async fn similarity(
        &self,
        job_text: &str,
        candidate_texts: &[String],
    ) -> Result<Vec<f32>, AppError> {
        if candidate_texts.is_empty() {
            return Ok(Vec::new());
        }

        match self {
            Self::EmbeddingCosine(embedder) => {
                embedding_similarity(embedder.as_ref(), job_text, candidate_texts).await
            }
            Self::CorpusRelativeLexical => lexical_similarity(job_text, candidate_texts),
        }
    }
}

async fn embedding_similarity(
    embedder: &dyn Embedder,
    job_text: &str,
    candidate_texts: &[String],
) -> Result<Vec<f32>, AppError> {
    let job_vector = embedder.embed(job_text).await?;
    let candidate_vectors = embedder.embed_batch(candidate_texts).await?;

    if candidate_vectors.len() != candidate_texts.len() {
        return Err(AppError::ScoringUnavailable(format!(
            "embedder returned {} vectors for {} candidates",
            candidate_vectors.len(),
            candidate_texts.len()
        )));
    }

    candidate_vectors
        .iter()
        .map(|vector| {
            if vector.len() != job_vector.len() {
                return Err(AppError::ScoringUnavailable(format!(
                    "embedding dimension mismatch: job {} vs candidate {}",
                    job_vector.len(),
                    vector.len()
                )));
            }
            Ok(cosine_similarity(&job_vector, vector))
        })
        .collect()
}

fn lexical_similarity(job_text: &str, candidate_texts: &[String]) -> Result<Vec<f32>, AppError> {
    let mut builder = TfIdfBuilder::new();
    let job = builder.add(job_text);
    let candidates: Vec<usize> = candidate_texts.iter().map(|t| builder.add(t)).collect();
    let space = builder.build()?;

    debug!(
        vocabulary = space.vocabulary_size(),
        documents = candidates.len() + 1,
        "fitted lexical space"
    );

    Ok(candidates.iter().map(|&c| space.cosine(job, c)).collect())
}
