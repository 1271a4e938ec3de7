//! Coarse job-domain detection from indicator keyword hits.

use serde::{Deserialize, Serialize};

use crate::engine::normalize::normalize;
use crate::engine::tables::DomainRule;

/// Domain returned when no indicator matches at all.
pub const GENERAL_DOMAIN: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMatch {
    pub domain: String,
    pub hits: usize,
}

pub struct DomainClassifier {
    rules: Vec<DomainRule>,
}

impl DomainClassifier {
    pub fn new(rules: Vec<DomainRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| DomainRule {
                name: rule.name,
                indicators: rule.indicators.iter().map(|i| i.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Domain with the most indicator substring hits.
    ///
    /// A non-zero tie goes to the domain listed first in the table; zero hits
    /// everywhere yields `general`.
    pub fn classify(&self, text: &str) -> DomainMatch {
        let text = normalize(text);
        let mut best = DomainMatch {
            domain: GENERAL_DOMAIN.to_string(),
            hits: 0,
        };

        for rule in &self.rules {
            let hits = rule
                .indicators
                .iter()
                .filter(|indicator| text.contains(indicator.as_str()))
                .count();
            if hits > best.hits {
                best = DomainMatch {
                    domain: rule.name.clone(),
                    hits,
                };
            }
        }

        best
    }
}
