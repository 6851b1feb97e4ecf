use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceTier {
    Beginner,
    BeginnerWithExperience,
    Intermediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationTier {
    Unspecified,
    Bac2,
    Bac3License,
    Bac5Master,
}

impl ExperienceTier {
    /// Stable name used for storage; matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceTier::Beginner => "beginner",
            ExperienceTier::BeginnerWithExperience => "beginner_with_experience",
            ExperienceTier::Intermediate => "intermediate",
        }
    }

    /// Human label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceTier::Beginner => "Beginner",
            ExperienceTier::BeginnerWithExperience => "Beginner with experience",
            ExperienceTier::Intermediate => "Intermediate",
        }
    }
}

impl EducationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationTier::Unspecified => "unspecified",
            EducationTier::Bac2 => "bac2",
            EducationTier::Bac3License => "bac3_license",
            EducationTier::Bac5Master => "bac5_master",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EducationTier::Unspecified => "Unspecified",
            EducationTier::Bac2 => "Bac+2",
            EducationTier::Bac3License => "Bac+3 (Licence)",
            EducationTier::Bac5Master => "Bac+5 (Master)",
        }
    }
}

impl fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for EducationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExperienceTier {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(ExperienceTier::Beginner),
            "beginner_with_experience" => Ok(ExperienceTier::BeginnerWithExperience),
            "intermediate" => Ok(ExperienceTier::Intermediate),
            other => Err(AnalysisError::UnknownTier(other.to_string())),
        }
    }
}

impl FromStr for EducationTier {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unspecified" => Ok(EducationTier::Unspecified),
            "bac2" => Ok(EducationTier::Bac2),
            "bac3_license" => Ok(EducationTier::Bac3License),
            "bac5_master" => Ok(EducationTier::Bac5Master),
            other => Err(AnalysisError::UnknownTier(other.to_string())),
        }
    }
}

/// Result of a tier classifier: the tier, its score contribution and an
/// optional strength line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierOutcome<T> {
    pub tier: T,
    pub points: i32,
    pub strength: Option<&'static str>,
}

const WORK_KEYWORDS: &[&str] = &["experience", "travail"];
const INTERNSHIP_KEYWORDS: &[&str] = &["stage", "internship"];

const MASTER_KEYWORDS: &[&str] = &["master", "bac+5"];
const LICENSE_KEYWORDS: &[&str] = &["licence", "bac+3"];
const BAC2_KEYWORDS: &[&str] = &["bac+2"];

pub const EXPERIENCE_STRENGTH: &str = "Demonstrated professional experience";
pub const MASTER_STRENGTH: &str = "Advanced education level (Master's)";

/// First matching check wins: work experience, then internships.
pub fn classify_experience(folded: &str) -> TierOutcome<ExperienceTier> {
    if contains_any(folded, WORK_KEYWORDS) {
        TierOutcome {
            tier: ExperienceTier::Intermediate,
            points: 20,
            strength: Some(EXPERIENCE_STRENGTH),
        }
    } else if contains_any(folded, INTERNSHIP_KEYWORDS) {
        TierOutcome {
            tier: ExperienceTier::BeginnerWithExperience,
            points: 10,
            strength: None,
        }
    } else {
        TierOutcome {
            tier: ExperienceTier::Beginner,
            points: 0,
            strength: None,
        }
    }
}

/// First matching check wins, highest degree first.
pub fn classify_education(folded: &str) -> TierOutcome<EducationTier> {
    if contains_any(folded, MASTER_KEYWORDS) {
        TierOutcome {
            tier: EducationTier::Bac5Master,
            points: 25,
            strength: Some(MASTER_STRENGTH),
        }
    } else if contains_any(folded, LICENSE_KEYWORDS) {
        TierOutcome {
            tier: EducationTier::Bac3License,
            points: 15,
            strength: None,
        }
    } else if contains_any(folded, BAC2_KEYWORDS) {
        TierOutcome {
            tier: EducationTier::Bac2,
            points: 10,
            strength: None,
        }
    } else {
        TierOutcome {
            tier: EducationTier::Unspecified,
            points: 0,
            strength: None,
        }
    }
}

pub(crate) fn contains_any(folded: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| folded.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_beats_internship() {
        let outcome = classify_experience("stage puis travail en cdi");
        assert_eq!(outcome.tier, ExperienceTier::Intermediate);
        assert_eq!(outcome.points, 20);
        assert_eq!(outcome.strength, Some(EXPERIENCE_STRENGTH));
    }

    #[test]
    fn test_internship_only() {
        let outcome = classify_experience("summer internship at acme");
        assert_eq!(outcome.tier, ExperienceTier::BeginnerWithExperience);
        assert_eq!(outcome.points, 10);
        assert!(outcome.strength.is_none());
    }

    #[test]
    fn test_stage_matches_inside_words() {
        // substring semantics: "advantage" contains "stage"
        let outcome = classify_experience("a real advantage");
        assert_eq!(outcome.tier, ExperienceTier::BeginnerWithExperience);
    }

    #[test]
    fn test_no_experience_is_beginner() {
        let outcome = classify_experience("student");
        assert_eq!(outcome.tier, ExperienceTier::Beginner);
        assert_eq!(outcome.points, 0);
    }

    #[test]
    fn test_master_beats_licence() {
        let outcome = classify_education("licence puis master");
        assert_eq!(outcome.tier, EducationTier::Bac5Master);
        assert_eq!(outcome.points, 25);
        assert_eq!(outcome.strength, Some(MASTER_STRENGTH));
    }

    #[test]
    fn test_education_ladder() {
        assert_eq!(classify_education("bac+3").tier, EducationTier::Bac3License);
        assert_eq!(classify_education("bac+3").points, 15);
        assert_eq!(classify_education("bts bac+2").tier, EducationTier::Bac2);
        assert_eq!(classify_education("bts bac+2").points, 10);
        assert_eq!(classify_education("bac").tier, EducationTier::Unspecified);
    }

    #[test]
    fn test_tier_names_round_trip() {
        for tier in [
            ExperienceTier::Beginner,
            ExperienceTier::BeginnerWithExperience,
            ExperienceTier::Intermediate,
        ] {
            assert_eq!(tier.as_str().parse::<ExperienceTier>().unwrap(), tier);
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
        }
        for tier in [
            EducationTier::Unspecified,
            EducationTier::Bac2,
            EducationTier::Bac3License,
            EducationTier::Bac5Master,
        ] {
            assert_eq!(tier.as_str().parse::<EducationTier>().unwrap(), tier);
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
        }
    }

    #[test]
    fn test_unknown_tier_name() {
        assert_eq!(
            "expert".parse::<ExperienceTier>(),
            Err(AnalysisError::UnknownTier("expert".to_string()))
        );
    }

    #[test]
    fn test_display_uses_labels() {
        assert_eq!(ExperienceTier::BeginnerWithExperience.to_string(), "Beginner with experience");
        assert_eq!(EducationTier::Bac3License.to_string(), "Bac+3 (Licence)");
    }
}
