use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::error::AnalysisError;
use crate::analysis::tiers::{EducationTier, ExperienceTier};

/// Caller-supplied analysis input. Name and department are echoed in logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub text: String,
    pub candidate_name: String,
    pub target_department: String,
}

impl AnalysisInput {
    pub fn new(
        text: impl Into<String>,
        candidate_name: impl Into<String>,
        target_department: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            candidate_name: candidate_name.into(),
            target_department: target_department.into(),
        }
    }

    /// Builds an input from an untyped JSON `text` field.
    /// Missing, null or non-string text is `InvalidInput`; an empty string is valid.
    pub fn from_json_text(
        text: Option<&Value>,
        candidate_name: &str,
        target_department: &str,
    ) -> Result<Self, AnalysisError> {
        match text {
            Some(Value::String(s)) => Ok(Self::new(s.as_str(), candidate_name, target_department)),
            None | Some(Value::Null) => Err(AnalysisError::InvalidInput(
                "text is required".to_string(),
            )),
            Some(other) => Err(AnalysisError::InvalidInput(format!(
                "text must be a string, got {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The engine's output record. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32, // 0 – 100
    pub skills: Vec<String>,
    pub experience_tier: ExperienceTier,
    pub education_tier: EducationTier,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
    pub analyzed_at: NaiveDate,
}

impl AnalysisResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

/// Three-band display scheme for score badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 75 => ScoreBand::Good,
            s if s >= 50 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}
