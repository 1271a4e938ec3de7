//! Skill catalog: compiled form of the table of {term, detection pattern, importance}.
//!
//! One generic loop replaces per-technology detection branches: every entry is
//! a regex compiled once at start-up, and the same entry supplies the
//! keyword importance used by the ranker's `importance` weighting.

use std::collections::HashMap;

use regex::Regex;

use crate::engine::tables::SkillRule;
use crate::errors::AppError;

struct CompiledSkill {
    term: String,
    pattern: Regex,
    importance: f32,
}

pub struct SkillCatalog {
    skills: Vec<CompiledSkill>,
    importance: HashMap<String, f32>,
}

impl SkillCatalog {
    pub fn compile(rules: &[SkillRule]) -> Result<Self, AppError> {
        let mut skills = Vec::with_capacity(rules.len());
        let mut importance = HashMap::with_capacity(rules.len());

        for rule in rules {
            let term = rule.term.trim().to_lowercase();
            let source = match &rule.pattern {
                Some(pattern) => pattern.clone(),
                None => literal_pattern(&term),
            };
            let pattern = Regex::new(&source).map_err(|e| {
                AppError::Config(format!("skill '{}' has invalid pattern: {e}", rule.term))
            })?;
            importance.insert(term.clone(), rule.importance);
            skills.push(CompiledSkill {
                term,
                pattern,
                importance: rule.importance,
            });
        }

        Ok(Self { skills, importance })
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Catalog terms detected in normalized text, in catalog order.
    pub fn detect(&self, text: &str) -> Vec<String> {
        self.skills
            .iter()
            .filter(|skill| skill.pattern.is_match(text))
            .map(|skill| skill.term.clone())
            .collect()
    }

    /// Importance of a term, if the catalog knows it.
    pub fn importance(&self, term: &str) -> Option<f32> {
        self.importance.get(term).copied()
    }

    /// Highest-importance catalog terms, for diagnostics.
    pub fn top_terms(&self, n: usize) -> Vec<(&str, f32)> {
        let mut terms: Vec<(&str, f32)> = self
            .skills
            .iter()
            .map(|s| (s.term.as_str(), s.importance))
            .collect();
        terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        terms.truncate(n);
        terms
    }
}

/// Literal match bounded by anything that cannot continue a technical token,
/// so `c++` and `c#` match while `java` does not match inside `javascript`.
fn literal_pattern(term: &str) -> String {
    format!(
        r"(?:^|[^a-z0-9+#]){}(?:$|[^a-z0-9+#])",
        regex::escape(term)
    )
}
