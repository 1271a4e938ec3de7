use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::keywords::KeywordStrategy;
use crate::engine::models::{CandidateDocument, JobDescription, RankOutcome};
use crate::engine::weights::{WeightVector, HISTORY_WINDOW};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CandidateInput {
    pub filename: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    /// Upstream parse failure for this document.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    #[serde(default)]
    pub candidates: Vec<CandidateInput>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub job: JobDescription,
    /// Blend a ranking request would use right now.
    pub weights: WeightVector,
    pub similarity: String,
    /// False under corpus-relative scoring, where IDF depends on the batch.
    pub comparable_across_requests: bool,
    pub keyword_strategy: KeywordStrategy,
    pub reference_year: i32,
    pub tables_version: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryStatus {
    pub records: usize,
    pub capacity: usize,
    pub mean_score: Option<f64>,
    /// Scores the next calibration will read, oldest first.
    pub recent_scores: Vec<f64>,
}

fn require_job_description(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl TryFrom<CandidateInput> for CandidateDocument {
    type Error = AppError;

    fn try_from(input: CandidateInput) -> Result<Self, Self::Error> {
        let filename = input.filename.trim();
        if filename.is_empty() {
            return Err(AppError::Validation(
                "every candidate needs a filename".to_string(),
            ));
        }
        if let Some(error) = input.error {
            return Ok(CandidateDocument::failed(filename, error));
        }

        let mut doc = CandidateDocument::new(filename, &input.text);
        if let Some(skills) = input.skills {
            doc = doc.with_skills(skills);
        }
        if let Some(years) = input.experience_years {
            doc = doc.with_experience(years);
        }
        Ok(doc)
    }
}

/// POST /api/v1/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankOutcome>, AppError> {
    require_job_description(&req.job_description)?;

    let candidates = req
        .candidates
        .into_iter()
        .map(CandidateDocument::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = state
        .ranker
        .rank(&req.job_description, &candidates, &state.history)
        .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/jd/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_job_description(&req.job_description)?;

    let job = state.ranker.analyze_job(&req.job_description)?;
    let recent = state.history.lock().await.recent_scores(HISTORY_WINDOW);
    let weights = state.ranker.calibrate_for(&job, &recent);

    Ok(Json(AnalyzeResponse {
        job,
        weights,
        similarity: state.ranker.similarity_label(),
        comparable_across_requests: state.ranker.scores_comparable_across_requests(),
        keyword_strategy: state.ranker.keyword_strategy(),
        reference_year: state.ranker.reference_year(),
        tables_version: state.ranker.tables_version().to_string(),
    }))
}

/// GET /api/v1/history
pub async fn handle_history(State(state): State<AppState>) -> Json<HistoryStatus> {
    let history = state.history.lock().await;
    Json(HistoryStatus {
        records: history.len(),
        capacity: history.capacity(),
        mean_score: history.mean_score(),
        recent_scores: history.recent_scores(HISTORY_WINDOW),
    })
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> StatusCode {
    let mut history = state.history.lock().await;
    let cleared = history.len();
    history.clear();
    info!("Cleared {cleared} history records");
    StatusCode::NO_CONTENT
}
