//! Persistence boundary for analysis results, keyed by candidature id.
//!
//! `AppState` carries an `Arc<dyn AnalysisStore>`: PostgreSQL when
//! `DATABASE_URL` is set, the in-process map otherwise.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::models::analysis::CvAnalysisRow;

/// An analysis attached to a candidature. One per candidature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatureAnalysis {
    pub candidature_id: Uuid,
    pub candidate_name: String,
    pub target_department: String,
    pub analysis: AnalysisResult,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Inserts the record, replacing any previous analysis for the candidature.
    async fn upsert(&self, record: &CandidatureAnalysis) -> Result<(), AppError>;

    async fn get(&self, candidature_id: Uuid) -> Result<Option<CandidatureAnalysis>, AppError>;

    /// All records, highest score first.
    async fn list(&self) -> Result<Vec<CandidatureAnalysis>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn upsert(&self, record: &CandidatureAnalysis) -> Result<(), AppError> {
        let analysis = &record.analysis;
        sqlx::query(
            r#"
            INSERT INTO cv_analyses
                (candidature_id, candidate_name, target_department, score, skills,
                 experience_tier, education_tier, strengths, improvements, summary,
                 analyzed_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (candidature_id) DO UPDATE SET
                candidate_name = EXCLUDED.candidate_name,
                target_department = EXCLUDED.target_department,
                score = EXCLUDED.score,
                skills = EXCLUDED.skills,
                experience_tier = EXCLUDED.experience_tier,
                education_tier = EXCLUDED.education_tier,
                strengths = EXCLUDED.strengths,
                improvements = EXCLUDED.improvements,
                summary = EXCLUDED.summary,
                analyzed_at = EXCLUDED.analyzed_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.candidature_id)
        .bind(&record.candidate_name)
        .bind(&record.target_department)
        .bind(analysis.score as i32)
        .bind(&analysis.skills)
        .bind(analysis.experience_tier.as_str())
        .bind(analysis.education_tier.as_str())
        .bind(&analysis.strengths)
        .bind(&analysis.improvements)
        .bind(&analysis.summary)
        .bind(analysis.analyzed_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Stored CV analysis for candidature {} (score {})",
            record.candidature_id, analysis.score
        );
        Ok(())
    }

    async fn get(&self, candidature_id: Uuid) -> Result<Option<CandidatureAnalysis>, AppError> {
        let row: Option<CvAnalysisRow> =
            sqlx::query_as("SELECT * FROM cv_analyses WHERE candidature_id = $1")
                .bind(candidature_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(CandidatureAnalysis::try_from).transpose()?)
    }

    async fn list(&self) -> Result<Vec<CandidatureAnalysis>, AppError> {
        let rows: Vec<CvAnalysisRow> =
            sqlx::query_as("SELECT * FROM cv_analyses ORDER BY score DESC, updated_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| CandidatureAnalysis::try_from(row).map_err(AppError::from))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

/// Map-backed store for running without a database. Contents die with the process.
#[derive(Default)]
pub struct InMemoryAnalysisStore {
    records: RwLock<HashMap<Uuid, CandidatureAnalysis>>,
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn upsert(&self, record: &CandidatureAnalysis) -> Result<(), AppError> {
        self.records
            .write()
            .await
            .insert(record.candidature_id, record.clone());
        Ok(())
    }

    async fn get(&self, candidature_id: Uuid) -> Result<Option<CandidatureAnalysis>, AppError> {
        Ok(self.records.read().await.get(&candidature_id).cloned())
    }

    async fn list(&self) -> Result<Vec<CandidatureAnalysis>, AppError> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| {
            b.analysis
                .score
                .cmp(&a.analysis.score)
                .then(b.updated_at.cmp(&a.updated_at))
        });
        Ok(records)
    }
}
