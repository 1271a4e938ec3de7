//! HTTP embedder: talks to an OpenAI-compatible `/embeddings` endpoint.
//!
//! Works against hosted APIs and self-hosted servers (text-embeddings-inference,
//! Ollama, vLLM) serving a pretrained sentence model such as all-MiniLM-L6-v2.
//! The endpoint is probed once in `connect`, so an unreachable model fails at
//! start-up rather than on the first ranking request.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Embedder, EmbeddingError};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Inputs per request; chunks are sent concurrently.
const BATCH_SIZE: usize = 32;
const PROBE_TEXT: &str = "embedding dimension probe";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbedder {
    /// Builds the client and probes the endpoint to learn the vector dimension.
    pub async fn connect(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut embedder = Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
            dimension: 0,
        };

        let probe = embedder.request(&[PROBE_TEXT.to_string()]).await?;
        embedder.dimension = probe.first().map(Vec::len).ok_or(EmbeddingError::EmptyResponse)?;
        info!(
            "Embedding endpoint ready: {} (model: {}, dimension: {})",
            embedder.endpoint, embedder.model, embedder.dimension
        );
        Ok(embedder)
    }

    /// One POST for up to `BATCH_SIZE` inputs.
    /// Retries on 429 and 5xx with exponential backoff.
    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let mut attempt = 0;

        loop {
            let mut builder = self.client.post(&self.endpoint).json(&body);
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }

            let error = match builder.send().await {
                Err(e) => EmbeddingError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!("Embedding API returned {}: {}", status, body);
                        EmbeddingError::Api {
                            status: status.as_u16(),
                            message: body,
                        }
                    } else if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        let message = serde_json::from_str::<ApiError>(&body)
                            .map(|e| e.error.message)
                            .unwrap_or(body);
                        return Err(EmbeddingError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    } else {
                        let text = response.text().await?;
                        let parsed: EmbeddingResponse = serde_json::from_str(&text)?;
                        let vectors = order_by_index(parsed.data, inputs.len())?;
                        debug!("Embedded {} inputs", vectors.len());
                        return Ok(vectors);
                    }
                }
            };

            attempt += 1;
            if attempt >= MAX_RETRIES {
                return Err(error);
            }

            // 500ms, 1s
            let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
            warn!(
                "Embedding request attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Restores input order and checks one vector came back per input.
fn order_by_index(
    mut data: Vec<EmbeddingData>,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if data.is_empty() {
        return Err(EmbeddingError::EmptyResponse);
    }
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: data.len(),
        });
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &'static str {
        "http"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::EmptyResponse)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let chunks = try_join_all(texts.chunks(BATCH_SIZE).map(|chunk| self.request(chunk))).await?;
        let vectors: Vec<Vec<f32>> = chunks.into_iter().flatten().collect();

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(index: usize, value: f32) -> EmbeddingData {
        EmbeddingData {
            embedding: vec![value],
            index,
        }
    }

    #[test]
    fn test_order_by_index_restores_input_order() {
        let ordered = order_by_index(vec![data(1, 1.0), data(0, 0.0), data(2, 2.0)], 3).unwrap();
        assert_eq!(ordered, vec![vec![0.0], vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_order_by_index_rejects_empty() {
        assert!(matches!(
            order_by_index(vec![], 2),
            Err(EmbeddingError::EmptyResponse)
        ));
    }

    #[test]
    fn test_order_by_index_rejects_count_mismatch() {
        assert!(matches!(
            order_by_index(vec![data(0, 0.0)], 2),
            Err(EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_response_deserializes_openai_shape() {
        let json = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "index": 0, "embedding": [0.1, 0.2]},
                {"object": "embedding", "index": 1, "embedding": [0.3, 0.4]}
            ],
            "model": "all-MiniLM-L6-v2"
        }"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn test_request_serializes_model_and_input() {
        let input = vec!["a".to_string(), "b".to_string()];
        let body = EmbeddingRequest {
            model: "all-MiniLM-L6-v2",
            input: &input,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "all-MiniLM-L6-v2");
        assert_eq!(json["input"][1], "b");
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_endpoint_fails() {
        let result = HttpEmbedder::connect("http://127.0.0.1:9", "all-MiniLM-L6-v2", None).await;
        // Retries exhausted: the last transport error is surfaced as-is.
        assert!(matches!(result, Err(EmbeddingError::Http(_))));
    }
}
