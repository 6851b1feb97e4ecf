//! CV scoring engine — maps raw CV text to a scored `AnalysisResult`.
//!
//! Default: `KeywordCvScorer` (rule tables, deterministic, no I/O).
//! `AppState` holds an `Arc<dyn CvScorer>` so another backend can be swapped in
//! without touching handlers.
//!
//! Pipeline: rule tables → tier classifiers → score aggregation → report assembly.
//! The score is clamped once, after every contribution has been summed.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::analysis::advisor::advise;
use crate::analysis::models::{AnalysisInput, AnalysisResult};
use crate::analysis::rules::{default_rules, matching_rules, RuleSet};
use crate::analysis::tiers::{classify_education, classify_experience};

pub const MAX_SCORE: i32 = 100;
pub const MAX_SKILLS: usize = 8;
pub const MAX_STRENGTHS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A CV scorer backend. Implementations must be pure: same input and date,
/// same result.
pub trait CvScorer: Send + Sync {
    fn analyze_on(&self, input: &AnalysisInput, analyzed_at: NaiveDate) -> AnalysisResult;

    /// Short backend name echoed in API responses.
    fn backend(&self) -> &'static str;

    /// Analyzes `input`, stamping today's UTC date.
    fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        self.analyze_on(input, Utc::now().date_naive())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordCvScorer
// ────────────────────────────────────────────────────────────────────────────

/// Rule-table scorer.
///
/// Algorithm:
/// 1. skill table: every keyword found adds its tag, its weight and a strength
/// 2. experience tier (+20 / +10 / 0) and education tier (+25 / +15 / +10 / 0)
/// 3. soft-skill table: every phrase found adds its tag and its weight
/// 4. dedup tags and strengths, clamp score to 0–100, then cap lists
#[derive(Debug, Clone, Default)]
pub struct KeywordCvScorer {
    rules: RuleSet,
}

impl KeywordCvScorer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl CvScorer for KeywordCvScorer {
    fn analyze_on(&self, input: &AnalysisInput, analyzed_at: NaiveDate) -> AnalysisResult {
        score_cv(&self.rules, input, analyzed_at)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Scores CV text with the built-in rule tables.
pub fn analyze(text: &str, candidate_name: &str, target_department: &str) -> AnalysisResult {
    let input = AnalysisInput::new(text, candidate_name, target_department);
    score_cv(default_rules(), &input, Utc::now().date_naive())
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

fn score_cv(rules: &RuleSet, input: &AnalysisInput, analyzed_at: NaiveDate) -> AnalysisResult {
    info!(
        candidate = %input.candidate_name,
        department = %input.target_department,
        "Starting CV analysis"
    );

    let folded = input.text.to_lowercase();
    let mut score: i32 = 0;
    let mut skills = Vec::new();
    let mut strengths = Vec::new();

    for rule in matching_rules(&rules.skills, &folded) {
        skills.push(rule.tag.clone());
        score += rule.weight;
        strengths.push(format!("Proficiency in {}", rule.tag));
    }

    let experience = classify_experience(&folded);
    score += experience.points;
    strengths.extend(experience.strength.map(String::from));

    let education = classify_education(&folded);
    score += education.points;
    strengths.extend(education.strength.map(String::from));

    for rule in matching_rules(&rules.soft_skills, &folded) {
        skills.push(rule.tag.clone());
        score += rule.weight;
    }

    let mut skills = dedup_in_order(skills);
    let skill_count = skills.len();
    skills.truncate(MAX_SKILLS);

    let mut strengths = dedup_in_order(strengths);
    strengths.truncate(MAX_STRENGTHS);

    let improvements = advise(&folded, experience.tier, skill_count);
    let score = score.clamp(0, MAX_SCORE) as u32;

    let summary = format!(
        "Candidate presenting {} identified skills. {} level. Education: {}.",
        skill_count, experience.tier, education.tier
    );

    debug!(
        candidate = %input.candidate_name,
        score,
        skills = skill_count,
        experience = experience.tier.as_str(),
        education = education.tier.as_str(),
        "CV analysis completed"
    );

    AnalysisResult {
        score,
        skills,
        experience_tier: experience.tier,
        education_tier: education.tier,
        strengths,
        improvements,
        summary,
        analyzed_at,
    }
}

/// Drops repeated entries, keeping the first occurrence.
fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::advisor::{ADD_PORTFOLIO, DEVELOP_SKILLS, EXPAND_EXPERIENCE};
    use crate::analysis::rules::SkillRule;
    use crate::analysis::tiers::{EducationTier, ExperienceTier};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    fn run(text: &str) -> AnalysisResult {
        KeywordCvScorer::default().analyze_on(&AnalysisInput::new(text, "Jane Doe", "IT"), date())
    }

    #[test]
    fn test_empty_text_minimal_result() {
        let result = run("");
        assert_eq!(result.score, 0);
        assert!(result.skills.is_empty());
        assert!(result.strengths.is_empty());
        assert_eq!(result.experience_tier, ExperienceTier::Beginner);
        assert_eq!(result.education_tier, EducationTier::Unspecified);
        assert_eq!(
            result.improvements,
            vec![EXPAND_EXPERIENCE, DEVELOP_SKILLS, ADD_PORTFOLIO]
        );
        assert_eq!(
            result.summary,
            "Candidate presenting 0 identified skills. Beginner level. Education: Unspecified."
        );
        assert_eq!(result.analyzed_at, date());
    }

    #[test]
    fn test_deterministic() {
        let text = "Licence informatique, stage en React et Node, teamwork";
        assert_eq!(run(text), run(text));
    }

    #[test]
    fn test_case_insensitive() {
        let upper = run("PYTHON developer");
        let lower = run("python developer");
        assert_eq!(upper, lower);
        assert_eq!(upper.skills, vec!["Python"]);
        assert_eq!(upper.score, 15);
    }

    #[test]
    fn test_substring_matching() {
        let result = run("I love javascripting");
        assert!(result.skills.contains(&"JavaScript".to_string()));
        // "javascript" also contains "java"
        assert!(result.skills.contains(&"Java".to_string()));
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let result = run("python python python java java");
        assert_eq!(result.skills, vec!["Python", "Java"]);
        assert_eq!(result.score, 30);
        assert_eq!(
            result.strengths,
            vec!["Proficiency in Python", "Proficiency in Java"]
        );
    }

    #[test]
    fn test_communication_scores_twice_tags_once() {
        let result = run("communication");
        assert_eq!(result.skills, vec!["Communication"]);
        assert_eq!(result.score, 13);
        assert!(result.summary.starts_with("Candidate presenting 1 identified skills."));
    }

    #[test]
    fn test_soft_skills_add_tags_without_strengths() {
        let result = run("teamwork and creativity");
        assert_eq!(result.skills, vec!["Teamwork", "Creativity"]);
        assert_eq!(result.score, 10);
        assert!(result.strengths.is_empty());
    }

    #[test]
    fn test_education_priority() {
        let result = run("master et licence");
        assert_eq!(result.education_tier, EducationTier::Bac5Master);
        assert_eq!(result.score, 25);
        assert_eq!(result.strengths, vec!["Advanced education level (Master's)"]);
    }

    #[test]
    fn test_portfolio_note_independent_of_score() {
        let result = run(
            "master, experience, python, javascript, sql, react, node, agile, scrum",
        );
        assert_eq!(result.score, 100);
        assert_eq!(result.improvements, vec![ADD_PORTFOLIO]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let result = run(
            "Master en informatique. 3 ans d'experience en Python et SQL. \
             Gestion de projet agile avec scrum. github.com/jdoe",
        );
        assert_eq!(
            result.skills,
            vec!["Python", "SQL", "Project Management", "Agile", "Scrum"]
        );
        // 58 from skills + 20 experience + 25 master = 103, clamped
        assert_eq!(result.score, 100);
        assert_eq!(result.experience_tier, ExperienceTier::Intermediate);
        assert_eq!(result.education_tier, EducationTier::Bac5Master);
        assert!(result.improvements.is_empty());
        assert_eq!(result.strengths.len(), MAX_STRENGTHS);
        assert_eq!(result.strengths[0], "Proficiency in Python");
        assert_eq!(
            result.summary,
            "Candidate presenting 5 identified skills. Intermediate level. Education: Bac+5 (Master)."
        );
    }

    #[test]
    fn test_caps_on_skills_and_strengths() {
        let result = run(
            "python javascript sql react node management leadership communication \
             projet agile scrum teamwork creativity problem solving experience master",
        );
        assert_eq!(result.skills.len(), MAX_SKILLS);
        assert_eq!(
            result.skills,
            vec![
                "Python",
                "JavaScript",
                "Java",
                "SQL",
                "React",
                "Node.js",
                "Management",
                "Leadership"
            ]
        );
        assert_eq!(result.strengths.len(), MAX_STRENGTHS);
        // the summary counts every distinct tag, before the cap
        assert!(result.summary.starts_with("Candidate presenting 15 identified skills."));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_internship_tier_without_strength() {
        let result = run("stage de fin d'etudes, bac+2");
        assert_eq!(result.experience_tier, ExperienceTier::BeginnerWithExperience);
        assert_eq!(result.education_tier, EducationTier::Bac2);
        assert_eq!(result.score, 20);
        assert!(result.strengths.is_empty());
        assert!(!result.improvements.contains(&EXPAND_EXPERIENCE.to_string()));
    }

    #[test]
    fn test_negative_weights_clamp_to_zero() {
        let scorer = KeywordCvScorer::new(RuleSet {
            skills: vec![SkillRule {
                keyword: "cobol".to_string(),
                tag: "COBOL".to_string(),
                weight: -40,
            }],
            soft_skills: vec![],
        });
        let result = scorer.analyze_on(&AnalysisInput::new("COBOL", "X", "Y"), date());
        assert_eq!(result.score, 0);
        assert_eq!(result.skills, vec!["COBOL"]);
    }

    #[test]
    fn test_score_always_bounded() {
        for text in ["", "python", "master experience python java sql react node agile scrum"] {
            assert!(run(text).score <= 100);
        }
    }

    #[test]
    fn test_free_function_uses_default_rules() {
        let result = analyze("python", "X", "Y");
        assert_eq!(result.skills, vec!["Python"]);
        assert_eq!(result.analyzed_at, Utc::now().date_naive());
    }

    #[test]
    fn test_scorer_exposes_its_rule_set() {
        let rules = RuleSet {
            skills: vec![SkillRule {
                keyword: "rust".to_string(),
                tag: "Rust".to_string(),
                weight: 20,
            }],
            soft_skills: vec![],
        };
        let scorer = KeywordCvScorer::new(rules.clone());
        assert_eq!(scorer.rules(), &rules);
        assert_eq!(KeywordCvScorer::default().rules(), default_rules());
    }

    #[test]
    fn test_backend_label_is_keyword() {
        assert_eq!(KeywordCvScorer::default().backend(), "keyword");
    }
}
