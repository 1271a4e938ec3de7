//! Weight calibration: adapts the (semantic, keyword, experience) blend per request.
//!
//! Inputs are the recent scoring history, the JD length and the detected
//! domain. The result always sums to 1.

use serde::{Deserialize, Serialize};

/// Number of most recent history records considered for the base weights.
pub const HISTORY_WINDOW: usize = 5;

const SHORT_JD_WORDS: usize = 50;
const LONG_JD_WORDS: usize = 150;

const LOW_CONFIDENCE_MEAN: f64 = 0.4;
const HIGH_CONFIDENCE_MEAN: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub semantic: f64,
    pub keyword: f64,
    pub experience: f64,
}

impl WeightVector {
    pub const DEFAULT: WeightVector = WeightVector {
        semantic: 0.6,
        keyword: 0.3,
        experience: 0.1,
    };

    pub fn sum(&self) -> f64 {
        self.semantic + self.keyword + self.experience
    }

    /// Clamps negatives to 0 and rescales to sum 1. An all-zero vector falls
    /// back to the default blend.
    fn normalized(self) -> WeightVector {
        let clamped = WeightVector {
            semantic: self.semantic.max(0.0),
            keyword: self.keyword.max(0.0),
            experience: self.experience.max(0.0),
        };
        let total = clamped.sum();
        if total <= f64::EPSILON {
            return WeightVector::DEFAULT;
        }
        WeightVector {
            semantic: clamped.semantic / total,
            keyword: clamped.keyword / total,
            experience: clamped.experience / total,
        }
    }
}

/// Base weights from the mean combined score of the last few records.
fn base_weights(recent_scores: &[f64]) -> WeightVector {
    let window = &recent_scores[recent_scores.len().saturating_sub(HISTORY_WINDOW)..];
    if window.is_empty() {
        return WeightVector::DEFAULT;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;

    if mean < LOW_CONFIDENCE_MEAN {
        // weak absolute scores: lean on meaning over literal overlap
        WeightVector {
            semantic: 0.7,
            keyword: 0.2,
            experience: 0.1,
        }
    } else if mean > HIGH_CONFIDENCE_MEAN {
        WeightVector {
            semantic: 0.55,
            keyword: 0.35,
            experience: 0.1,
        }
    } else {
        WeightVector::DEFAULT
    }
}

/// Calibrates the blend for one request.
///
/// `recent_scores` are combined scores from history, oldest first; only the
/// last [`HISTORY_WINDOW`] are used.
pub fn calibrate(recent_scores: &[f64], jd_word_count: usize, domain: &str) -> WeightVector {
    let mut weights = base_weights(recent_scores);

    if jd_word_count < SHORT_JD_WORDS {
        weights.semantic += 0.1;
    } else if jd_word_count > LONG_JD_WORDS {
        weights.keyword += 0.05;
    }

    match domain {
        "software" | "data" => {
            weights.semantic += 0.05;
            weights.keyword += 0.1;
        }
        "marketing" | "sales" => weights.keyword += 0.15,
        "finance" | "hr" => weights.experience += 0.1,
        _ => {}
    }

    weights.normalized()
}
