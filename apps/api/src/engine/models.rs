use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::normalize::normalize;
use crate::engine::summary::RankSummary;
use crate::engine::weights::WeightVector;

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

/// A JD keyword with its rank score and its term frequency in the JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdKeyword {
    pub term: String,
    pub rank_score: f32,
    pub frequency: u32,
}

/// Everything extracted from one job description. Built once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(skip)]
    pub normalized_text: String,
    /// Ordered by importance, best first.
    pub keywords: Vec<JdKeyword>,
    pub domain: String,
    pub domain_hits: usize,
    /// 0 means the JD states no requirement.
    pub required_years: u32,
    pub word_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// One parsed resume as handed to the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub filename: String,
    /// Normalized text.
    pub text: String,
    /// Lowercased skills. Empty means none were supplied.
    pub skills: Vec<String>,
    /// `None` when the upstream parser gave no estimate.
    pub experience_years: Option<u32>,
    /// Set when the upstream parser failed on this document.
    pub error: Option<String>,
}

impl CandidateDocument {
    pub fn new(filename: impl Into<String>, raw_text: &str) -> Self {
        Self {
            filename: filename.into(),
            text: normalize(raw_text),
            skills: Vec::new(),
            experience_years: None,
            error: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: String::new(),
            skills: Vec::new(),
            experience_years: None,
            error: Some(error.into()),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skills = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = Some(years);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub filename: String,
    pub similarity_score: f64,
    pub keyword_score: f64,
    pub experience_score: f64,
    pub combined_score: f64,
    /// JD keywords found in the candidate's skills, in JD keyword order.
    pub matching_keywords: Vec<String>,
    pub experience_years: u32,
    pub skills_found: Vec<String>,
    /// Post-hoc factor already folded into `combined_score`, when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStatus {
    Ranked,
    NoCandidates,
    NoScorableCandidates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excluded {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankOutcome {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: RankStatus,
    /// e.g. `embedding:hash`.
    pub similarity: String,
    pub weights: WeightVector,
    pub job: JobDescription,
    /// Sorted by `combined_score` descending; ties keep input order.
    pub records: Vec<ScoreRecord>,
    pub excluded: Vec<Excluded>,
    pub summary: RankSummary,
}
