use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;

use crate::engine::embedding::EmbeddingBackend;
use crate::engine::keywords::KeywordStrategy;
use crate::engine::ranker::{KeywordWeighting, RankerOptions};
use crate::engine::similarity::SimilarityStrategy;

/// A pretrained model behind an embeddings endpoint, e.g. all-MiniLM-L6-v2.
const DEFAULT_EMBEDDING_BACKEND: &str = "http";

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub similarity_strategy: SimilarityStrategy,
    pub embedding_backend: EmbeddingBackend,
    /// Required when `embedding_backend` is `http`.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    /// Vector width of the hash backend. The http backend learns its own.
    pub embedding_dimension: usize,
    pub keyword_strategy: KeywordStrategy,
    pub keyword_limit: usize,
    pub keyword_weighting: KeywordWeighting,
    pub experience_multiplier: bool,
    pub history_capacity: usize,
    pub reference_year: i32,
    pub scoring_tables_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let embedding_backend: EmbeddingBackend =
            parse_env("EMBEDDING_BACKEND", DEFAULT_EMBEDDING_BACKEND)?;
        let embedding_api_url = match embedding_backend {
            EmbeddingBackend::Http => Some(require_env("EMBEDDING_API_URL")?),
            EmbeddingBackend::Hash => optional_env("EMBEDDING_API_URL"),
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            similarity_strategy: parse_env("SIMILARITY_STRATEGY", "embedding")?,
            embedding_backend,
            embedding_api_url,
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
            embedding_dimension: parse_env("EMBEDDING_DIMENSION", "384")?,
            keyword_strategy: parse_env("KEYWORD_STRATEGY", "frequency")?,
            keyword_limit: parse_env("KEYWORD_LIMIT", "50")?,
            keyword_weighting: parse_env("KEYWORD_WEIGHTING", "frequency")?,
            experience_multiplier: parse_env("EXPERIENCE_MULTIPLIER", "false")?,
            history_capacity: parse_env("HISTORY_CAPACITY", "50")?,
            reference_year: match optional_env("REFERENCE_YEAR") {
                Some(year) => year
                    .parse()
                    .context("REFERENCE_YEAR must be a four-digit year")?,
                None => chrono::Utc::now().year(),
            },
            scoring_tables_path: optional_env("SCORING_TABLES_PATH").map(PathBuf::from),
        })
    }

    pub fn ranker_options(&self) -> RankerOptions {
        RankerOptions {
            keyword_strategy: self.keyword_strategy,
            keyword_limit: self.keyword_limit,
            keyword_weighting: self.keyword_weighting,
            experience_multiplier: self.experience_multiplier,
            reference_year: self.reference_year,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Reads `key` (or `default`) and parses it, naming the variable on failure.
fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_parse_env_uses_default() {
        let limit: usize = parse_env("SCREENER_TEST_UNSET_LIMIT", "50").unwrap();
        assert_eq!(limit, 50);
    }

    #[test]
    fn test_parse_env_reports_variable_name() {
        std::env::set_var("SCREENER_TEST_BAD_STRATEGY", "bm25");
        let err = parse_env::<SimilarityStrategy>("SCREENER_TEST_BAD_STRATEGY", "embedding")
            .unwrap_err()
            .to_string();
        assert!(err.contains("SCREENER_TEST_BAD_STRATEGY"));
        assert!(err.contains("expected one of"));
    }

    #[test]
    fn test_parse_env_bool() {
        std::env::set_var("SCREENER_TEST_MULTIPLIER", "true");
        assert!(parse_env::<bool>("SCREENER_TEST_MULTIPLIER", "false").unwrap());
    }

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("SCREENER_TEST_BLANK", "  ");
        assert_eq!(optional_env("SCREENER_TEST_BLANK"), None);
    }

    #[test]
    fn test_default_backend_needs_model_endpoint() {
        let backend: EmbeddingBackend =
            parse_env("SCREENER_TEST_UNSET_BACKEND", DEFAULT_EMBEDDING_BACKEND).unwrap();
        assert_eq!(backend, EmbeddingBackend::Http);
        assert!(backend.is_semantic());
    }

    #[test]
    fn test_require_env_names_missing_variable() {
        let err = require_env("SCREENER_TEST_MISSING_URL").unwrap_err().to_string();
        assert!(err.contains("SCREENER_TEST_MISSING_URL"));
    }
}
