//! Aggregate view of one ranking run.

use serde::{Deserialize, Serialize};

use crate::engine::models::ScoreRecord;

const HIGHLY_QUALIFIED_ABOVE: f64 = 0.7;
const GOOD_FROM: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCandidate {
    pub filename: String,
    pub combined_score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankSummary {
    pub total_candidates: usize,
    pub scored: usize,
    pub excluded: usize,
    pub mean_combined_score: f64,
    pub top_candidate: Option<TopCandidate>,
    /// combined > 0.7
    pub highly_qualified: usize,
    /// 0.5 <= combined <= 0.7
    pub good: usize,
    /// combined < 0.5
    pub below: usize,
}

impl RankSummary {
    /// `records` must already be sorted best first.
    pub fn from_records(records: &[ScoreRecord], total_candidates: usize) -> Self {
        let scored = records.len();
        let mean_combined_score = if scored == 0 {
            0.0
        } else {
            records.iter().map(|r| r.combined_score).sum::<f64>() / scored as f64
        };

        let mut summary = RankSummary {
            total_candidates,
            scored,
            excluded: total_candidates.saturating_sub(scored),
            mean_combined_score,
            top_candidate: records.first().map(|r| TopCandidate {
                filename: r.filename.clone(),
                combined_score: r.combined_score,
            }),
            ..Default::default()
        };

        for record in records {
            let score = record.combined_score;
            if score > HIGHLY_QUALIFIED_ABOVE {
                summary.highly_qualified += 1;
            } else if score >= GOOD_FROM {
                summary.good += 1;
            } else {
                summary.below += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: f64) -> ScoreRecord {
        ScoreRecord {
            filename: name.to_string(),
            similarity_score: 0.0,
            keyword_score: 0.0,
            experience_score: 0.0,
            combined_score: score,
            matching_keywords: vec![],
            experience_years: 0,
            skills_found: vec![],
            experience_multiplier: None,
        }
    }

    #[test]
    fn test_tiers_and_boundaries() {
        let records = [
            record("a", 0.9),
            record("b", 0.7),
            record("c", 0.5),
            record("d", 0.49),
        ];
        let summary = RankSummary::from_records(&records, 6);
        assert_eq!(summary.highly_qualified, 1);
        assert_eq!(summary.good, 2);
        assert_eq!(summary.below, 1);
        assert_eq!(summary.excluded, 2);
        assert_eq!(summary.top_candidate.unwrap().filename, "a");
        assert!((summary.mean_combined_score - 0.6475).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run() {
        let summary = RankSummary::from_records(&[], 0);
        assert_eq!(summary, RankSummary::default());
    }
}
