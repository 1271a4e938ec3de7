//! TF-IDF vector space fit over one request's corpus.
//!
//! Vocabulary and IDF depend on every document added, so scores computed in
//! one space are not comparable with scores from a space fit on a different
//! batch.

use std::collections::{BTreeMap, HashMap};

use crate::errors::AppError;

/// Sparse L2-normalized vector, sorted by term index.
pub type SparseVector = Vec<(usize, f32)>;

pub struct TfIdfBuilder {
    documents: Vec<Vec<String>>,
}

pub struct TfIdf {
    vocab: HashMap<String, usize>,
    idf: Vec<f32>,
    vectors: Vec<SparseVector>,
}

/// Tokens are runs of letters, digits, `+` and `#` with at least two characters.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

impl TfIdfBuilder {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    pub fn add(&mut self, document: &str) -> usize {
        self.documents.push(tokenize(document));
        self.documents.len() - 1
    }

    /// Fits vocabulary and smoothed IDF, `ln((1 + n) / (1 + df)) + 1`, then
    /// vectorizes every document. Fails when no document has a single token.
    pub fn build(self) -> Result<TfIdf, AppError> {
        let mut vocab: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for doc in &self.documents {
            let mut seen: Vec<usize> = Vec::new();
            for token in doc {
                let next = vocab.len();
                let idx = *vocab.entry(token.clone()).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                if !seen.contains(&idx) {
                    seen.push(idx);
                    doc_freq[idx] += 1;
                }
            }
        }

        if vocab.is_empty() {
            return Err(AppError::ScoringUnavailable(
                "empty vocabulary; documents contain no scorable terms".to_string(),
            ));
        }

        let n = self.documents.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let vectors = self
            .documents
            .iter()
            .map(|doc| vectorize(doc, &vocab, &idf))
            .collect();

        Ok(TfIdf { vocab, idf, vectors })
    }
}

impl Default for TfIdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn vectorize(doc: &[String], vocab: &HashMap<String, usize>, idf: &[f32]) -> SparseVector {
    let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
    for token in doc {
        if let Some(&idx) = vocab.get(token) {
            *counts.entry(idx).or_insert(0.0) += 1.0;
        }
    }

    let mut vector: SparseVector = counts
        .into_iter()
        .map(|(idx, tf)| (idx, tf * idf[idx]))
        .collect();

    let norm: f32 = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut vector {
            *w /= norm;
        }
    }
    vector
}

impl TfIdf {
    pub fn vocabulary_size(&self) -> usize {
        self.vocab.len()
    }

    /// Cosine similarity between two fitted documents.
    pub fn cosine(&self, a: usize, b: usize) -> f32 {
        match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => sparse_dot(va, vb),
            _ => 0.0,
        }
    }
}

/// Dot product of two index-sorted sparse vectors (already unit length).
fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0f32;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_documents_score_one() {
        let mut builder = TfIdfBuilder::new();
        let a = builder.add("python django rest api");
        let b = builder.add("python django rest api");
        let tfidf = builder.build().unwrap();
        assert!((tfidf.cosine(a, b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        let mut builder = TfIdfBuilder::new();
        let a = builder.add("python django");
        let b = builder.add("nursing triage");
        let tfidf = builder.build().unwrap();
        assert_eq!(tfidf.cosine(a, b), 0.0);
    }

    #[test]
    fn test_rare_terms_get_higher_idf() {
        let mut builder = TfIdfBuilder::new();
        builder.add("python kafka");
        builder.add("python sql");
        builder.add("python git");
        let tfidf = builder.build().unwrap();
        let idf = |term: &str| tfidf.idf[tfidf.vocab[term]];
        assert!(idf("kafka") > idf("python"));
        assert!((idf("python") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_vocabulary_is_scoring_unavailable() {
        let mut builder = TfIdfBuilder::new();
        builder.add("a . ,");
        builder.add("");
        assert!(matches!(
            builder.build(),
            Err(AppError::ScoringUnavailable(_))
        ));
    }

    #[test]
    fn test_tokenizer_keeps_symbol_terms() {
        assert_eq!(tokenize("C++ and c# (.net)"), vec!["c++", "and", "c#", "net"]);
    }

    #[test]
    fn test_out_of_range_document_scores_zero() {
        let mut builder = TfIdfBuilder::new();
        builder.add("python");
        let tfidf = builder.build().unwrap();
        assert_eq!(tfidf.cosine(0, 5), 0.0);
        assert_eq!(tfidf.vocabulary_size(), 1);
    }
}
