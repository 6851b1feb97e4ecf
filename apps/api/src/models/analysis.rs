use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::error::AnalysisError;
use crate::analysis::models::AnalysisResult;
use crate::analysis::store::CandidatureAnalysis;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvAnalysisRow {
    pub candidature_id: Uuid,
    pub candidate_name: String,
    pub target_department: String,
    pub score: i32,
    pub skills: Vec<String>,
    pub experience_tier: String,
    pub education_tier: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
    pub analyzed_at: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CvAnalysisRow> for CandidatureAnalysis {
    type Error = AnalysisError;

    fn try_from(row: CvAnalysisRow) -> Result<Self, Self::Error> {
        Ok(CandidatureAnalysis {
            candidature_id: row.candidature_id,
            candidate_name: row.candidate_name,
            target_department: row.target_department,
            analysis: AnalysisResult {
                score: row.score.clamp(0, 100) as u32,
                skills: row.skills,
                experience_tier: row.experience_tier.parse()?,
                education_tier: row.education_tier.parse()?,
                strengths: row.strengths,
                improvements: row.improvements,
                summary: row.summary,
                analyzed_at: row.analyzed_at,
            },
            updated_at: row.updated_at,
        })
    }
}
