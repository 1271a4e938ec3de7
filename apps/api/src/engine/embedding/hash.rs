use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use super::{Embedder, EmbeddingError};
use crate::engine::normalize::normalize;

/// Fixed keys so vectors are stable across runs and Rust versions.
/// Changing them changes every embedding.
const HASH_SEED_K0: u64 = 0x5eed_0f_c0ff_ee01;
const HASH_SEED_K1: u64 = 0x1eaf_ba5e_d00d_f00d;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedder over unigrams and bigrams.
///
/// Captures word overlap, not meaning. Select it with `EMBEDDING_BACKEND=hash`
/// for offline runs and tests; production scoring uses the http backend.
///
/// - deterministic, no model to load
/// - each text is encoded on its own, so scores are batch-independent
/// - signed hashing keeps collisions from only ever adding similarity
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        feature.hash(&mut hasher);
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = self.hash(feature);
        let idx = (h % self.dimension as u64) as usize;
        // top bit picks the sign, independent of the bucket bits
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }

    pub fn encode(&self, text: &str) -> Vec<f32> {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized
            .split_whitespace()
            .filter(|t| t.chars().count() > 1)
            .collect();

        let mut vector = vec![0.0f32; self.dimension];
        for token in &tokens {
            self.add_feature(&mut vector, token, UNIGRAM_WEIGHT);
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.encode(text))
    }
}
