//! Axum route handlers for the CV analysis API.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::error::AnalysisError;
use crate::analysis::extract::extract_document;
use crate::analysis::models::{AnalysisInput, AnalysisResult, ScoreBand};
use crate::analysis::ranking::{matches_search, rank_by_score, ScoreDistribution};
use crate::analysis::store::CandidatureAnalysis;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// `text` stays untyped so a non-string value surfaces as `INVALID_INPUT`
/// instead of a generic JSON rejection.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub target_department: String,
}

impl TryFrom<&AnalyzeRequest> for AnalysisInput {
    type Error = AnalysisError;

    fn try_from(request: &AnalyzeRequest) -> Result<Self, Self::Error> {
        AnalysisInput::from_json_text(
            request.text.as_ref(),
            &request.candidate_name,
            &request.target_department,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisResult,
    pub band: ScoreBand,
    pub scorer_backend: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub candidates: Vec<AnalyzeRequest>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchEntry {
    /// Index of the candidate in the request.
    pub position: usize,
    pub candidate_name: String,
    pub target_department: String,
    pub band: ScoreBand,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    pub distribution: ScoreDistribution,
    pub results: Vec<BatchEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub target_department: String,
}

#[derive(Debug, Serialize)]
pub struct StoredAnalysisResponse {
    #[serde(flatten)]
    pub record: CandidatureAnalysis,
    pub band: ScoreBand,
}

impl From<CandidatureAnalysis> for StoredAnalysisResponse {
    fn from(record: CandidatureAnalysis) -> Self {
        let band = record.analysis.band();
        Self { record, band }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub band: Option<ScoreBand>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisListResponse {
    pub distribution: ScoreDistribution,
    pub analyses: Vec<StoredAnalysisResponse>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let input = AnalysisInput::try_from(&request)?;
    Ok(Json(respond(&state, &input)))
}

/// POST /api/v1/cv/analyze/batch
///
/// Scores every candidate, then ranks highest score first. Any invalid entry
/// fails the whole batch before anything is scored. The distribution covers
/// the whole batch; `search` only filters the returned rows.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::Validation("candidates cannot be empty".to_string()));
    }
    if request.candidates.len() > state.config.max_batch_size {
        return Err(AppError::Validation(format!(
            "batch holds {} candidates, limit is {}",
            request.candidates.len(),
            state.config.max_batch_size
        )));
    }

    let inputs = request
        .candidates
        .iter()
        .enumerate()
        .map(|(position, candidate)| {
            AnalysisInput::try_from(candidate).map_err(|e| match e {
                AnalysisError::InvalidInput(msg) => {
                    AnalysisError::InvalidInput(format!("candidate {position}: {msg}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let analyses: Vec<_> = inputs
        .iter()
        .map(|input| state.scorer.analyze(input))
        .collect();
    let distribution = ScoreDistribution::from_scores(analyses.iter().map(|a| a.score));

    let mut results: Vec<BatchEntry> = inputs
        .into_iter()
        .zip(analyses)
        .enumerate()
        .filter(|(_, (input, _))| {
            matches_search(
                request.search.as_deref(),
                &[
                    input.candidate_name.as_str(),
                    input.target_department.as_str(),
                ],
            )
        })
        .map(|(position, (input, analysis))| BatchEntry {
            position,
            candidate_name: input.candidate_name,
            target_department: input.target_department,
            band: analysis.band(),
            analysis,
        })
        .collect();
    rank_by_score(&mut results, |entry| entry.analysis.score);

    Ok(Json(BatchAnalyzeResponse {
        distribution,
        results,
    }))
}

/// POST /api/v1/cv/analyze/document
///
/// Raw `text/plain` or `application/pdf` body. Extraction fails before the
/// engine runs if the document cannot be turned into text.
pub async fn handle_analyze_document(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let text = extract_document(body, content_type).await?;

    let input = AnalysisInput::new(text, query.candidate_name, query.target_department);
    Ok(Json(respond(&state, &input)))
}

/// PUT /api/v1/candidatures/:id/analysis
///
/// Analyzes the CV and stores the result for the candidature, replacing any
/// earlier analysis.
pub async fn handle_store_analysis(
    State(state): State<AppState>,
    Path(candidature_id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<StoredAnalysisResponse>, AppError> {
    let input = AnalysisInput::try_from(&request)?;
    let analysis = state.scorer.analyze(&input);

    let record = CandidatureAnalysis {
        candidature_id,
        candidate_name: input.candidate_name,
        target_department: input.target_department,
        analysis,
        updated_at: Utc::now(),
    };
    state.store.upsert(&record).await?;

    Ok(Json(record.into()))
}

/// GET /api/v1/candidatures/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(candidature_id): Path<Uuid>,
) -> Result<Json<StoredAnalysisResponse>, AppError> {
    let record = state.store.get(candidature_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("No analysis for candidature {candidature_id}"))
    })?;
    Ok(Json(record.into()))
}

/// GET /api/v1/candidatures/analyses
///
/// Stored analyses, highest score first, with the HR score distribution over
/// every stored analysis.
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AnalysisListResponse>, AppError> {
    let records = state.store.list().await?;
    let distribution = ScoreDistribution::from_scores(records.iter().map(|r| r.analysis.score));

    let mut analyses: Vec<StoredAnalysisResponse> = records
        .into_iter()
        .filter(|r| {
            matches_search(
                query.search.as_deref(),
                &[r.candidate_name.as_str(), r.target_department.as_str()],
            )
        })
        .map(StoredAnalysisResponse::from)
        .filter(|r| query.band.map_or(true, |band| r.band == band))
        .collect();
    rank_by_score(&mut analyses, |r| r.record.analysis.score);

    Ok(Json(AnalysisListResponse {
        distribution,
        analyses,
    }))
}

fn respond(state: &AppState, input: &AnalysisInput) -> AnalysisResponse {
    let analysis = state.scorer.analyze(input);
    AnalysisResponse {
        band: analysis.band(),
        analysis,
        scorer_backend: state.scorer.backend().to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
