//! Bounded scoring history feeding weight calibration.
//!
//! Owned by the caller and passed into the ranker explicitly. Appending past
//! capacity evicts the oldest records first.

use std::collections::VecDeque;

use crate::engine::models::ScoreRecord;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct ScoringHistoryContext {
    records: VecDeque<ScoreRecord>,
    capacity: usize,
}

impl ScoringHistoryContext {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one run's records in the order given.
    pub fn append(&mut self, records: &[ScoreRecord]) {
        for record in records {
            if self.records.len() == self.capacity {
                self.records.pop_front();
            }
            self.records.push_back(record.clone());
        }
    }

    /// Combined scores of the last `n` records, oldest first.
    pub fn recent_scores(&self, n: usize) -> Vec<f64> {
        let skip = self.records.len().saturating_sub(n);
        self.records
            .iter()
            .skip(skip)
            .map(|r| r.combined_score)
            .collect()
    }

    pub fn mean_score(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let total: f64 = self.records.iter().map(|r| r.combined_score).sum();
        Some(total / self.records.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for ScoringHistoryContext {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: f64) -> ScoreRecord {
        ScoreRecord {
            filename: name.to_string(),
            similarity_score: score,
            keyword_score: score,
            experience_score: score,
            combined_score: score,
            matching_keywords: vec![],
            experience_years: 0,
            skills_found: vec![],
            experience_multiplier: None,
        }
    }

    #[test]
    fn test_append_evicts_oldest() {
        let mut history = ScoringHistoryContext::new(3);
        history.append(&[record("a", 0.1), record("b", 0.2)]);
        history.append(&[record("c", 0.3), record("d", 0.4)]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.recent_scores(10), vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_recent_scores_takes_tail() {
        let mut history = ScoringHistoryContext::default();
        let records: Vec<_> = (0..8).map(|i| record("x", i as f64 / 10.0)).collect();
        history.append(&records);
        assert_eq!(history.recent_scores(2), vec![0.6, 0.7]);
    }

    #[test]
    fn test_mean_and_clear() {
        let mut history = ScoringHistoryContext::new(10);
        assert_eq!(history.mean_score(), None);
        history.append(&[record("a", 0.2), record("b", 0.4)]);
        assert!((history.mean_score().unwrap() - 0.3).abs() < 1e-12);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 10);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut history = ScoringHistoryContext::new(0);
        history.append(&[record("a", 0.2), record("b", 0.4)]);
        assert_eq!(history.recent_scores(5), vec![0.4]);
    }
}
