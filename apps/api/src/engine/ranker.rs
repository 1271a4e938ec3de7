//! Ranker: scores a batch of candidates against one job description.
//!
//! Pipeline per request:
//! 1. analyze the JD (keywords, domain, required years)
//! 2. snapshot recent history scores and calibrate the weight blend
//! 3. batch similarity over every scorable candidate
//! 4. per-candidate keyword and experience scores, weighted sum
//! 5. stable sort, then append the records to history in one step
//!
//! The history lock is never held across the similarity call. A request that
//! fails or is dropped before step 5 leaves the history untouched.

use std::{fmt, str};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::domain::DomainClassifier;
use crate::engine::experience::ExperienceExtractor;
use crate::engine::history::ScoringHistoryContext;
use crate::engine::keywords::{term_frequency, KeywordExtractor, KeywordStrategy};
use crate::engine::models::{
    CandidateDocument, Excluded, JdKeyword, JobDescription, RankOutcome, RankStatus, ScoreRecord,
};
use crate::engine::normalize::{normalize, word_count};
use crate::engine::similarity::SimilarityEngine;
use crate::engine::skills::SkillCatalog;
use crate::engine::summary::RankSummary;
use crate::engine::tables::{ExperienceTiers, ScoringTables};
use crate::engine::weights::{calibrate, WeightVector, HISTORY_WINDOW};
use crate::errors::AppError;

/// Largest post-hoc adjustment the experience multiplier applies, either way.
const MULTIPLIER_SPAN: f64 = 0.2;

/// How JD keywords are weighted when computing keyword_score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordWeighting {
    /// Term frequency in the JD.
    #[default]
    Frequency,
    /// Skill-catalog importance; terms the catalog does not know weigh 1.0.
    Importance,
}

impl fmt::Display for KeywordWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency => write!(f, "frequency"),
            Self::Importance => write!(f, "importance"),
        }
    }
}

impl str::FromStr for KeywordWeighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frequency" | "freq" => Ok(Self::Frequency),
            "importance" | "catalog" => Ok(Self::Importance),
            _ => Err(format!(
                "unknown keyword weighting '{s}', expected one of: frequency, importance"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankerOptions {
    pub keyword_strategy: KeywordStrategy,
    pub keyword_limit: usize,
    pub keyword_weighting: KeywordWeighting,
    pub experience_multiplier: bool,
    pub reference_year: i32,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self {
            keyword_strategy: KeywordStrategy::Frequency,
            keyword_limit: 50,
            keyword_weighting: KeywordWeighting::Frequency,
            experience_multiplier: false,
            reference_year: 2024,
        }
    }
}

pub struct Ranker {
    keywords: KeywordExtractor,
    experience: ExperienceExtractor,
    domains: DomainClassifier,
    skills: SkillCatalog,
    tiers: ExperienceTiers,
    similarity: SimilarityEngine,
    weighting: KeywordWeighting,
    experience_multiplier: bool,
    tables_version: String,
}

impl Ranker {
    pub fn new(
        tables: ScoringTables,
        similarity: SimilarityEngine,
        options: RankerOptions,
    ) -> Result<Self, AppError> {
        tables.validate()?;
        let skills = SkillCatalog::compile(&tables.skills)?;

        info!(
            "Ranker ready: tables v{}, {} skills, {} domains, similarity {}, keywords {} (limit {}), weighting {}",
            tables.version,
            skills.len(),
            tables.domains.len(),
            similarity.describe(),
            options.keyword_strategy,
            options.keyword_limit,
            options.keyword_weighting
        );
        debug!("Highest-importance skills: {:?}", skills.top_terms(5));

        Ok(Self {
            keywords: KeywordExtractor::new(options.keyword_strategy, options.keyword_limit),
            experience: ExperienceExtractor::new(options.reference_year),
            domains: DomainClassifier::new(tables.domains),
            skills,
            tiers: tables.experience_tiers,
            similarity,
            weighting: options.keyword_weighting,
            experience_multiplier: options.experience_multiplier,
            tables_version: tables.version,
        })
    }

    pub fn tables_version(&self) -> &str {
        &self.tables_version
    }

    pub fn similarity_label(&self) -> String {
        self.similarity.describe()
    }

    /// Whether scores from different requests can be compared directly.
    pub fn scores_comparable_across_requests(&self) -> bool {
        self.similarity.comparable_across_requests()
    }

    pub fn keyword_strategy(&self) -> KeywordStrategy {
        self.keywords.strategy()
    }

    pub fn reference_year(&self) -> i32 {
        self.experience.reference_year()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Job description
    // ────────────────────────────────────────────────────────────────────────

    /// Extracts keywords, domain and required years. Blank text is rejected.
    pub fn analyze_job(&self, raw_text: &str) -> Result<JobDescription, AppError> {
        let normalized_text = normalize(raw_text);
        if normalized_text.is_empty() {
            return Err(AppError::InvalidInput(
                "job description is empty".to_string(),
            ));
        }

        let mut keywords: Vec<JdKeyword> = self
            .keywords
            .extract(&normalized_text)
            .into_iter()
            .map(|k| JdKeyword {
                frequency: term_frequency(&k.term, &normalized_text).max(1),
                term: k.term,
                rank_score: k.score,
            })
            .collect();
        self.append_catalog_terms(&normalized_text, &mut keywords);
        let domain = self.domains.classify(&normalized_text);

        Ok(JobDescription {
            keywords,
            domain: domain.domain,
            domain_hits: domain.hits,
            required_years: self.experience.extract_years(&normalized_text),
            word_count: word_count(&normalized_text),
            normalized_text,
        })
    }

    /// Appends catalog skills named in the JD that the extractor missed,
    /// multi-word ones such as "rest api" included, in order of first mention.
    /// Candidate skill lists use catalog terms, so these can match exactly.
    fn append_catalog_terms(&self, normalized_text: &str, keywords: &mut Vec<JdKeyword>) {
        let mut found: Vec<(usize, String)> = self
            .skills
            .detect(normalized_text)
            .into_iter()
            .filter(|term| !keywords.iter().any(|k| &k.term == term))
            .map(|term| (normalized_text.find(term.as_str()).unwrap_or(usize::MAX), term))
            .collect();
        found.sort_by_key(|(position, _)| *position);

        for (_, term) in found {
            keywords.push(JdKeyword {
                frequency: term_frequency(&term, normalized_text).max(1),
                rank_score: self.skills.importance(&term).unwrap_or(1.0),
                term,
            });
        }
    }

    /// Weights the given history would produce for this JD.
    pub fn calibrate_for(&self, job: &JobDescription, recent_scores: &[f64]) -> WeightVector {
        calibrate(recent_scores, job.word_count, &job.domain)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Ranking
    // ────────────────────────────────────────────────────────────────────────

    pub async fn rank(
        &self,
        job_description: &str,
        candidates: &[CandidateDocument],
        history: &Mutex<ScoringHistoryContext>,
    ) -> Result<RankOutcome, AppError> {
        let job = self.analyze_job(job_description)?;

        let mut excluded = Vec::new();
        let mut scorable = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match exclusion_reason(candidate) {
                Some(reason) => {
                    debug!(filename = %candidate.filename, %reason, "candidate excluded");
                    excluded.push(Excluded {
                        filename: candidate.filename.clone(),
                        reason,
                    });
                }
                None => scorable.push(self.complete(candidate)),
            }
        }

        let recent = history.lock().await.recent_scores(HISTORY_WINDOW);
        let weights = self.calibrate_for(&job, &recent);
        info!(
            "Calibrated weights for domain '{}': semantic={:.3} keyword={:.3} experience={:.3}",
            job.domain, weights.semantic, weights.keyword, weights.experience
        );

        let status = if candidates.is_empty() {
            RankStatus::NoCandidates
        } else if scorable.is_empty() {
            RankStatus::NoScorableCandidates
        } else {
            RankStatus::Ranked
        };

        let mut records = Vec::with_capacity(scorable.len());
        if status == RankStatus::Ranked {
            let texts: Vec<String> = scorable.iter().map(|c| c.text.clone()).collect();
            let similarities = self
                .similarity
                .similarity(&job.normalized_text, &texts)
                .await?;

            for (candidate, similarity) in scorable.iter().zip(similarities) {
                let record = self.score(&job, candidate, similarity, &weights);
                debug!(
                    filename = %record.filename,
                    similarity = record.similarity_score,
                    keyword = record.keyword_score,
                    experience = record.experience_score,
                    combined = record.combined_score,
                    "candidate scored"
                );
                records.push(record);
            }

            // stable: equal scores keep input order
            records.sort_by(|a, b| {
                b.combined_score
                    .partial_cmp(&a.combined_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            history.lock().await.append(&records);
        }

        let summary = RankSummary::from_records(&records, candidates.len());
        info!(
            "Ranked {} of {} candidates ({} excluded), status {:?}",
            summary.scored, summary.total_candidates, summary.excluded, status
        );

        Ok(RankOutcome {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status,
            similarity: self.similarity.describe(),
            weights,
            job,
            records,
            excluded,
            summary,
        })
    }

    /// Fills in skills and experience the upstream parser did not supply.
    fn complete(&self, candidate: &CandidateDocument) -> CandidateDocument {
        let mut candidate = candidate.clone();
        if candidate.skills.is_empty() {
            candidate.skills = self.skills.detect(&candidate.text);
        }
        if candidate.experience_years.is_none() {
            candidate.experience_years = Some(self.experience.extract_years(&candidate.text));
        }
        candidate
    }

    fn score(
        &self,
        job: &JobDescription,
        candidate: &CandidateDocument,
        similarity: f32,
        weights: &WeightVector,
    ) -> ScoreRecord {
        let (keyword_score, matching_keywords) = self.keyword_score(job, &candidate.skills);
        let years = candidate.experience_years.unwrap_or(0);
        let experience_score = self.tiers.score(years, job.required_years);
        let similarity_score = f64::from(similarity).clamp(0.0, 1.0);

        let mut combined_score = weights.semantic * similarity_score
            + weights.keyword * keyword_score
            + weights.experience * experience_score;

        let experience_multiplier = if self.experience_multiplier {
            let factor = experience_multiplier(years, job.required_years);
            combined_score *= factor;
            Some(factor)
        } else {
            None
        };

        ScoreRecord {
            filename: candidate.filename.clone(),
            similarity_score,
            keyword_score,
            experience_score,
            combined_score,
            matching_keywords,
            experience_years: years,
            skills_found: candidate.skills.clone(),
            experience_multiplier,
        }
    }

    /// Weighted share of JD keywords present in the candidate's skills.
    fn keyword_score(&self, job: &JobDescription, skills: &[String]) -> (f64, Vec<String>) {
        let mut total = 0.0;
        let mut matched = 0.0;
        let mut matching = Vec::new();

        for keyword in &job.keywords {
            let weight = match self.weighting {
                KeywordWeighting::Frequency => f64::from(keyword.frequency),
                KeywordWeighting::Importance => {
                    f64::from(self.skills.importance(&keyword.term).unwrap_or(1.0))
                }
            };
            total += weight;
            if skills.iter().any(|s| s == &keyword.term) {
                matched += weight;
                matching.push(keyword.term.clone());
            }
        }

        if total <= 0.0 {
            return (0.0, matching);
        }
        (matched / total, matching)
    }
}

fn exclusion_reason(candidate: &CandidateDocument) -> Option<String> {
    if let Some(error) = &candidate.error {
        return Some(format!("parse error: {error}"));
    }
    if candidate.text.trim().is_empty() {
        return Some("no extractable text".to_string());
    }
    None
}

/// `1 + 0.2 * clamp((candidate - required) / required, -1, 1)`, or 1.0 when
/// the JD states no requirement.
pub fn experience_multiplier(candidate_years: u32, required_years: u32) -> f64 {
    if required_years == 0 {
        return 1.0;
    }
    let relative =
        (f64::from(candidate_years) - f64::from(required_years)) / f64::from(required_years);
    1.0 + MULTIPLIER_SPAN * relative.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::engine::embedding::{Embedder, EmbeddingError, HashEmbedder};

    const SCENARIO_A_JD: &str = "3+ years Python experience, Django, REST API, SQL, Git";

    fn ranker_with(options: RankerOptions) -> Ranker {
        let similarity = SimilarityEngine::EmbeddingCosine(Arc::new(HashEmbedder::new(384)));
        Ranker::new(ScoringTables::default(), similarity, options).unwrap()
    }

    fn ranker() -> Ranker {
        ranker_with(RankerOptions::default())
    }

    fn history() -> Mutex<ScoringHistoryContext> {
        Mutex::new(ScoringHistoryContext::default())
    }

    fn candidate(name: &str, text: &str, skills: &[&str], years: u32) -> CandidateDocument {
        CandidateDocument::new(name, text)
            .with_skills(skills.iter().copied())
            .with_experience(years)
    }

    #[test]
    fn test_scenario_a_job_analysis() {
        let job = ranker().analyze_job(SCENARIO_A_JD).unwrap();
        assert_eq!(job.required_years, 3);
        assert_eq!(job.domain, "software");
        let terms: Vec<&str> = job.keywords.iter().map(|k| k.term.as_str()).collect();
        assert!(terms.contains(&"python"));
        assert!(terms.contains(&"django"));
    }

    #[tokio::test]
    async fn test_scenario_a_keyword_score_prefers_matching_skills() {
        let text = "software engineer building web services";
        let candidates = vec![
            candidate("java.pdf", text, &["java", "spring"], 5),
            candidate("python.pdf", text, &["python", "django", "sql", "git"], 5),
        ];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();

        let python = outcome.records.iter().find(|r| r.filename == "python.pdf").unwrap();
        let java = outcome.records.iter().find(|r| r.filename == "java.pdf").unwrap();
        assert!(python.keyword_score > java.keyword_score);
        assert_eq!(java.keyword_score, 0.0);
        assert_eq!(python.matching_keywords, vec!["python", "django", "sql", "git"]);
        assert_eq!(outcome.records[0].filename, "python.pdf");
    }

    #[tokio::test]
    async fn test_multiword_skill_matches_jd_phrase() {
        let job = ranker().analyze_job(SCENARIO_A_JD).unwrap();
        let rest = job.keywords.iter().find(|k| k.term == "rest api").unwrap();
        assert_eq!(rest.frequency, 1);
        assert_eq!(job.keywords.iter().filter(|k| k.term == "python").count(), 1);

        let candidates = vec![
            candidate("listed.pdf", "backend engineer", &["REST API"], 3),
            CandidateDocument::new("derived.pdf", "Built REST API services, RESTful APIs"),
        ];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();
        for record in &outcome.records {
            assert!(
                record.matching_keywords.contains(&"rest api".to_string()),
                "{}",
                record.filename
            );
            assert!(record.keyword_score > 0.0, "{}", record.filename);
        }
    }

    #[tokio::test]
    async fn test_scenario_b_experience_tiers() {
        let jd = "Backend developer, 5+ years experience with Python and SQL";
        let text = "backend developer python sql";
        let candidates = vec![
            candidate("junior.pdf", text, &["python"], 0),
            candidate("senior.pdf", text, &["python"], 10),
        ];
        let outcome = ranker().rank(jd, &candidates, &history()).await.unwrap();
        assert_eq!(outcome.job.required_years, 5);

        let junior = outcome.records.iter().find(|r| r.filename == "junior.pdf").unwrap();
        let senior = outcome.records.iter().find(|r| r.filename == "senior.pdf").unwrap();
        assert_eq!(junior.experience_score, 0.0);
        assert_eq!(senior.experience_score, 1.0);
    }

    #[tokio::test]
    async fn test_scenario_c_no_candidates() {
        let history = history();
        let outcome = ranker().rank(SCENARIO_A_JD, &[], &history).await.unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.status, RankStatus::NoCandidates);
        assert!(history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_scenario_d_all_parse_errors() {
        let candidates = vec![
            CandidateDocument::failed("a.pdf", "encrypted"),
            CandidateDocument::failed("b.docx", "corrupt archive"),
        ];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.status, RankStatus::NoScorableCandidates);
        assert_eq!(outcome.excluded.len(), 2);
        assert_eq!(outcome.excluded[1].reason, "parse error: corrupt archive");
        assert_eq!(outcome.summary.excluded, 2);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_invalid_input() {
        let candidates = vec![candidate("a.pdf", "python", &["python"], 1)];
        let result = ranker().rank("  \n\t ", &candidates, &history()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_output_sorted_and_stable_on_ties() {
        let text = "python django developer";
        let candidates = vec![
            candidate("weak.pdf", "registered nurse", &[], 0),
            candidate("first.pdf", text, &["python"], 4),
            candidate("second.pdf", text, &["python"], 4),
        ];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();

        let scores: Vec<f64> = outcome.records.iter().map(|r| r.combined_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        let names: Vec<&str> = outcome.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["first.pdf", "second.pdf", "weak.pdf"]);
    }

    #[tokio::test]
    async fn test_parse_errors_do_not_affect_others() {
        let good = vec![
            candidate("a.pdf", "python django rest api", &["python"], 3),
            candidate("b.pdf", "java spring", &["java"], 2),
        ];
        let mut mixed = good.clone();
        mixed.insert(1, CandidateDocument::failed("bad.pdf", "unreadable"));

        let ranker = ranker();
        let clean = ranker.rank(SCENARIO_A_JD, &good, &history()).await.unwrap();
        let noisy = ranker.rank(SCENARIO_A_JD, &mixed, &history()).await.unwrap();

        assert_eq!(clean.records, noisy.records);
        assert!(noisy.records.iter().all(|r| r.filename != "bad.pdf"));
        assert_eq!(noisy.excluded[0].filename, "bad.pdf");
    }

    #[tokio::test]
    async fn test_empty_text_candidate_is_excluded() {
        let candidates = vec![
            CandidateDocument::new("blank.pdf", "   "),
            candidate("ok.pdf", "python", &["python"], 1),
        ];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.excluded[0].filename, "blank.pdf");
        assert_eq!(outcome.status, RankStatus::Ranked);
    }

    #[tokio::test]
    async fn test_history_appended_after_ranking() {
        let history = history();
        let candidates = vec![
            candidate("a.pdf", "python django", &["python"], 3),
            candidate("b.pdf", "java spring", &["java"], 2),
        ];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history)
            .await
            .unwrap();

        let guard = history.lock().await;
        assert_eq!(guard.len(), 2);
        let expected: Vec<f64> = outcome.records.iter().map(|r| r.combined_score).collect();
        assert_eq!(guard.recent_scores(2), expected);
    }

    #[tokio::test]
    async fn test_history_changes_later_weights() {
        let history = Mutex::new(ScoringHistoryContext::default());
        history.lock().await.append(&[ScoreRecord {
            filename: "old.pdf".to_string(),
            similarity_score: 0.1,
            keyword_score: 0.1,
            experience_score: 0.1,
            combined_score: 0.1,
            matching_keywords: vec![],
            experience_years: 0,
            skills_found: vec![],
            experience_multiplier: None,
        }]);

        let candidates = vec![candidate("a.pdf", "python", &["python"], 3)];
        let ranker = ranker();
        let with_history = ranker.rank(SCENARIO_A_JD, &candidates, &history).await.unwrap();
        let without = ranker
            .rank(SCENARIO_A_JD, &candidates, &Mutex::new(ScoringHistoryContext::default()))
            .await
            .unwrap();
        assert!(with_history.weights.semantic > without.weights.semantic);
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn dimension(&self) -> usize {
            8
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 503,
                message: "model loading".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_similarity_failure_fails_request_and_keeps_history() {
        let ranker = Ranker::new(
            ScoringTables::default(),
            SimilarityEngine::EmbeddingCosine(Arc::new(FailingEmbedder)),
            RankerOptions::default(),
        )
        .unwrap();
        let history = history();
        let candidates = vec![candidate("a.pdf", "python", &["python"], 3)];

        let result = ranker.rank(SCENARIO_A_JD, &candidates, &history).await;
        assert!(matches!(result, Err(AppError::ScoringUnavailable(_))));
        assert!(history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_lexical_strategy_ranks() {
        let ranker = Ranker::new(
            ScoringTables::default(),
            SimilarityEngine::CorpusRelativeLexical,
            RankerOptions::default(),
        )
        .unwrap();
        let candidates = vec![
            candidate("nurse.pdf", "registered nurse patient care", &[], 6),
            candidate("dev.pdf", "python django rest api sql git", &[], 6),
        ];
        let outcome = ranker
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();
        assert_eq!(outcome.records[0].filename, "dev.pdf");
        assert_eq!(outcome.similarity, "lexical:tfidf");
        assert!(!ranker.scores_comparable_across_requests());
    }

    #[tokio::test]
    async fn test_missing_skills_and_experience_are_derived() {
        let candidates = vec![CandidateDocument::new(
            "derived.pdf",
            "Python and Django developer, 2018 - 2023, PostgreSQL and Git",
        )];
        let outcome = ranker()
            .rank(SCENARIO_A_JD, &candidates, &history())
            .await
            .unwrap();
        let record = &outcome.records[0];
        assert_eq!(record.experience_years, 5);
        assert!(record.skills_found.contains(&"python".to_string()));
        assert!(record.skills_found.contains(&"postgresql".to_string()));
        assert!(record.matching_keywords.contains(&"git".to_string()));
    }

    #[tokio::test]
    async fn test_importance_weighting_uses_catalog() {
        let ranker = ranker_with(RankerOptions {
            keyword_weighting: KeywordWeighting::Importance,
            ..RankerOptions::default()
        });
        let candidates = vec![candidate("a.pdf", "team player", &["communication"], 0)];
        let outcome = ranker
            .rank("python communication", &candidates, &history())
            .await
            .unwrap();
        // communication 0.5 of python 2.0 + communication 0.5
        assert!((outcome.records[0].keyword_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_experience_multiplier_bounds() {
        assert!((experience_multiplier(10, 5) - 1.2).abs() < 1e-12);
        assert!((experience_multiplier(50, 5) - 1.2).abs() < 1e-12);
        assert!((experience_multiplier(0, 5) - 0.8).abs() < 1e-12);
        assert!((experience_multiplier(5, 5) - 1.0).abs() < 1e-12);
        assert_eq!(experience_multiplier(7, 0), 1.0);
    }

    #[tokio::test]
    async fn test_multiplier_recorded_only_when_enabled() {
        let jd = "5+ years experience python";
        let candidates = vec![candidate("a.pdf", "python", &["python"], 10)];

        let plain = ranker().rank(jd, &candidates, &history()).await.unwrap();
        assert!(plain.records[0].experience_multiplier.is_none());

        let boosted = ranker_with(RankerOptions {
            experience_multiplier: true,
            ..RankerOptions::default()
        })
        .rank(jd, &candidates, &history())
        .await
        .unwrap();
        let record = &boosted.records[0];
        assert_eq!(record.experience_multiplier, Some(1.2));
        assert!((record.combined_score - plain.records[0].combined_score * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_weighting_from_str() {
        assert_eq!(
            "Importance".parse::<KeywordWeighting>().unwrap(),
            KeywordWeighting::Importance
        );
        assert!("tfidf".parse::<KeywordWeighting>().is_err());
    }
}
