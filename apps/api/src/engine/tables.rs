//! Scoring tables: versioned configuration data consumed by the engine.
//!
//! Domain indicators, the skill catalog and the experience tier table live
//! here as data rather than inline literals so they can be tuned and tested
//! independently of the algorithms. Defaults are compiled in; a JSON file with
//! the same shape can replace them at start-up (`SCORING_TABLES_PATH`).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_TABLES_VERSION: &str = "2024.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTables {
    pub version: String,
    /// Iteration order is the tie-break order for domain classification.
    pub domains: Vec<DomainRule>,
    pub skills: Vec<SkillRule>,
    pub experience_tiers: ExperienceTiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRule {
    pub name: String,
    pub indicators: Vec<String>,
}

/// One catalog entry: canonical term, optional detection regex, importance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRule {
    pub term: String,
    /// Regex run against normalized text. Defaults to a word-bounded literal match.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default = "default_importance")]
    pub importance: f32,
}

fn default_importance() -> f32 {
    1.0
}

/// Experience score as a function of candidate_years / required_years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTiers {
    /// Score when the JD states no requirement.
    pub unspecified: f64,
    /// Checked in order; first tier whose `min_ratio` the ratio reaches wins.
    pub tiers: Vec<ExperienceTier>,
    /// Below every tier but with some experience.
    pub partial: f64,
    /// No experience at all against a stated requirement.
    pub none: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTier {
    pub min_ratio: f64,
    pub score: f64,
}

impl ExperienceTiers {
    pub fn score(&self, candidate_years: u32, required_years: u32) -> f64 {
        if required_years == 0 {
            return self.unspecified;
        }
        let ratio = candidate_years as f64 / required_years as f64;
        if let Some(tier) = self.tiers.iter().find(|t| ratio >= t.min_ratio) {
            return tier.score;
        }
        if candidate_years > 0 {
            self.partial
        } else {
            self.none
        }
    }
}

impl Default for ExperienceTiers {
    fn default() -> Self {
        Self {
            unspecified: 0.8,
            tiers: vec![
                ExperienceTier {
                    min_ratio: 1.5,
                    score: 1.0,
                },
                ExperienceTier {
                    min_ratio: 1.0,
                    score: 0.9,
                },
                ExperienceTier {
                    min_ratio: 0.8,
                    score: 0.7,
                },
            ],
            partial: 0.5,
            none: 0.0,
        }
    }
}

const DEFAULT_DOMAINS: &[(&str, &[&str])] = &[
    (
        "software",
        &[
            "developer", "java", "python", "api", "software", "backend", "frontend",
            "full stack", "cloud",
        ],
    ),
    (
        "data",
        &[
            "data", "machine learning", "ml", "ai", "analytics", "statistics", "deep learning",
            "model",
        ],
    ),
    (
        "marketing",
        &["seo", "campaign", "digital", "marketing", "brand", "social media", "advertising"],
    ),
    (
        "finance",
        &["finance", "accounting", "budget", "investment", "tax", "auditing", "banking"],
    ),
    (
        "hr",
        &["recruitment", "talent", "hiring", "employee", "human resources", "onboarding"],
    ),
    (
        "design",
        &["ui", "ux", "design", "figma", "adobe", "illustrator", "photoshop", "creative"],
    ),
    (
        "management",
        &["project", "manager", "leadership", "planning", "execution", "stakeholder"],
    ),
    (
        "sales",
        &["sales", "customer", "lead", "target", "negotiation", "crm", "pipeline"],
    ),
];

/// (term, pattern override, importance). Core technologies weigh more than soft skills.
const DEFAULT_SKILLS: &[(&str, Option<&str>, f32)] = &[
    // languages
    ("python", None, 2.0),
    ("java", None, 2.0),
    ("javascript", None, 2.0),
    ("typescript", None, 2.0),
    ("c++", None, 2.0),
    ("c#", None, 2.0),
    ("go", Some(r"\bgolang\b|\bgo\s+(?:language|developer|programming)\b"), 2.0),
    ("rust", None, 2.0),
    ("kotlin", None, 2.0),
    ("swift", None, 2.0),
    ("php", None, 1.5),
    ("scala", None, 1.5),
    ("sql", None, 1.5),
    ("html", None, 1.0),
    ("css", None, 1.0),
    ("bash", None, 1.0),
    // frameworks
    ("django", None, 1.5),
    ("flask", None, 1.5),
    ("fastapi", None, 1.5),
    ("spring", Some(r"\bspring(?:\s+boot)?\b"), 1.5),
    ("react", Some(r"\breact(?:\.?js)?\b"), 1.5),
    ("angular", None, 1.5),
    ("vue", Some(r"\bvue(?:\.?js)?\b"), 1.5),
    ("node", Some(r"\bnode(?:\.?js)?\b"), 1.5),
    ("express", None, 1.0),
    (".net", Some(r"(?:^|\s)(?:\.net|dotnet)\b"), 1.5),
    ("rest api", Some(r"\brest(?:ful)?\s*apis?\b"), 1.5),
    ("graphql", None, 1.5),
    // data and ml
    ("machine learning", None, 1.5),
    ("deep learning", None, 1.5),
    ("data analysis", None, 1.2),
    ("data science", None, 1.5),
    ("nlp", None, 1.5),
    ("computer vision", None, 1.5),
    ("tensorflow", None, 1.5),
    ("pytorch", None, 1.5),
    ("scikit-learn", Some(r"\bscikit-learn\b|\bsklearn\b"), 1.2),
    ("pandas", None, 1.2),
    ("numpy", None, 1.2),
    ("spark", None, 1.2),
    ("hadoop", None, 1.0),
    ("tableau", None, 1.0),
    ("power bi", Some(r"\bpower\s*bi\b"), 1.0),
    ("excel", None, 0.8),
    // databases
    ("mysql", None, 1.2),
    ("postgresql", Some(r"\bpostgres(?:ql)?\b"), 1.2),
    ("mongodb", Some(r"\bmongo(?:db)?\b"), 1.2),
    ("redis", None, 1.2),
    ("elasticsearch", None, 1.2),
    ("nosql", None, 1.0),
    // cloud and devops
    ("aws", None, 1.5),
    ("azure", None, 1.5),
    ("gcp", Some(r"\bgcp\b|\bgoogle\s+cloud\b"), 1.5),
    ("docker", None, 1.5),
    ("kubernetes", Some(r"\bkubernetes\b|\bk8s\b"), 1.5),
    ("terraform", None, 1.2),
    ("jenkins", None, 1.0),
    ("ci-cd", Some(r"\bci\s*-?\s*cd\b"), 1.0),
    ("git", None, 1.0),
    ("linux", None, 1.0),
    // testing
    ("selenium", None, 1.0),
    ("pytest", None, 1.0),
    ("junit", None, 1.0),
    ("testing", None, 0.8),
    ("debugging", None, 0.8),
    // delivery and soft skills
    ("agile", None, 0.7),
    ("scrum", None, 0.7),
    ("jira", None, 0.6),
    ("project management", None, 0.8),
    ("communication", None, 0.5),
    ("leadership", None, 0.5),
    ("collaboration", None, 0.5),
    ("teamwork", None, 0.5),
    ("problem solving", None, 0.5),
    ("customer service", None, 0.5),
    // other domains
    ("seo", None, 1.2),
    ("marketing", None, 1.0),
    ("sales", None, 1.0),
    ("finance", None, 1.0),
    ("accounting", None, 1.2),
    ("recruitment", None, 1.0),
    ("figma", None, 1.2),
    ("ui", None, 0.8),
    ("ux", None, 0.8),
];

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            version: DEFAULT_TABLES_VERSION.to_string(),
            domains: DEFAULT_DOMAINS
                .iter()
                .map(|(name, indicators)| DomainRule {
                    name: name.to_string(),
                    indicators: indicators.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
            skills: DEFAULT_SKILLS
                .iter()
                .map(|(term, pattern, importance)| SkillRule {
                    term: term.to_string(),
                    pattern: pattern.map(str::to_string),
                    importance: *importance,
                })
                .collect(),
            experience_tiers: ExperienceTiers::default(),
        }
    }
}

impl ScoringTables {
    /// Reads and validates a JSON table file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read scoring tables {}: {e}", path.display()))
        })?;
        let tables: ScoringTables = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("invalid scoring tables {}: {e}", path.display()))
        })?;
        tables.validate()?;
        Ok(tables)
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut names = HashSet::new();
        for domain in &self.domains {
            if domain.name.trim().is_empty() {
                return Err(AppError::Config("domain name cannot be empty".to_string()));
            }
            if !names.insert(domain.name.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate domain '{}'",
                    domain.name
                )));
            }
        }

        for skill in &self.skills {
            if skill.term.trim().is_empty() {
                return Err(AppError::Config("skill term cannot be empty".to_string()));
            }
            if !skill.importance.is_finite() || skill.importance < 0.0 {
                return Err(AppError::Config(format!(
                    "skill '{}' has invalid importance {}",
                    skill.term, skill.importance
                )));
            }
        }

        let tiers = &self.experience_tiers;
        let scores = tiers
            .tiers
            .iter()
            .map(|t| t.score)
            .chain([tiers.unspecified, tiers.partial, tiers.none]);
        for score in scores {
            if !(0.0..=1.0).contains(&score) {
                return Err(AppError::Config(format!(
                    "experience score {score} outside [0, 1]"
                )));
            }
        }
        if tiers
            .tiers
            .windows(2)
            .any(|pair| pair[0].min_ratio <= pair[1].min_ratio)
        {
            return Err(AppError::Config(
                "experience tiers must be ordered by descending min_ratio".to_string(),
            ));
        }

        Ok(())
    }
}
