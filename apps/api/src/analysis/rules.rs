//! Skill rule tables — keyword → canonical tag → weight.
//!
//! Matching is a substring test on the case-folded CV text, so `"javascripting"`
//! matches `javascript` and `"javascript"` also matches `java`.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A single keyword rule. `keyword` is stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRule {
    pub keyword: String,
    pub tag: String,
    pub weight: i32,
}

const DEFAULT_SKILL_RULES: &[(&str, &str, i32)] = &[
    ("python", "Python", 15),
    ("javascript", "JavaScript", 15),
    ("java", "Java", 15),
    ("sql", "SQL", 15),
    ("react", "React", 12),
    ("node", "Node.js", 12),
    ("management", "Management", 10),
    ("leadership", "Leadership", 10),
    ("communication", "Communication", 8),
    ("projet", "Project Management", 8),
    ("agile", "Agile", 10),
    ("scrum", "Scrum", 10),
];

// `communication` also sits in the skill table: it scores 8 + 5 but only one
// "Communication" tag survives dedup.
const DEFAULT_SOFT_SKILL_RULES: &[(&str, &str, i32)] = &[
    ("communication", "Communication", 5),
    ("teamwork", "Teamwork", 5),
    ("creativity", "Creativity", 5),
    ("problem solving", "Problem Solving", 5),
];

/// Ordered skill and soft-skill tables. Table order is evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub skills: Vec<SkillRule>,
    #[serde(default)]
    pub soft_skills: Vec<SkillRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            skills: to_rules(DEFAULT_SKILL_RULES),
            soft_skills: to_rules(DEFAULT_SOFT_SKILL_RULES),
        }
    }
}

impl RuleSet {
    /// Parses a rule set from JSON and normalizes its keywords.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut rules: RuleSet =
            serde_json::from_str(raw).context("Rule set is not valid JSON")?;
        rules.normalize()?;
        Ok(rules)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule set '{}'", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("Invalid rule set '{}'", path.display()))
    }

    fn normalize(&mut self) -> Result<()> {
        for rule in self.skills.iter_mut().chain(self.soft_skills.iter_mut()) {
            rule.keyword = rule.keyword.trim().to_lowercase();
            if rule.keyword.is_empty() {
                bail!("Rule for tag '{}' has an empty keyword", rule.tag);
            }
            if rule.tag.trim().is_empty() {
                bail!("Rule for keyword '{}' has an empty tag", rule.keyword);
            }
        }
        Ok(())
    }
}

/// Process-wide built-in rule set, built on first use.
pub fn default_rules() -> &'static RuleSet {
    static RULES: OnceLock<RuleSet> = OnceLock::new();
    RULES.get_or_init(RuleSet::default)
}

/// Rules whose keyword occurs in `folded`, in table order.
pub fn matching_rules<'a>(
    rules: &'a [SkillRule],
    folded: &'a str,
) -> impl Iterator<Item = &'a SkillRule> + 'a {
    rules
        .iter()
        .filter(move |rule| folded.contains(rule.keyword.as_str()))
}

fn to_rules(table: &[(&str, &str, i32)]) -> Vec<SkillRule> {
    table
        .iter()
        .map(|&(keyword, tag, weight)| SkillRule {
            keyword: keyword.to_string(),
            tag: tag.to_string(),
            weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables_keep_order() {
        let rules = RuleSet::default();
        assert_eq!(rules.skills.len(), 12);
        assert_eq!(rules.skills[0].tag, "Python");
        assert_eq!(rules.skills[11].tag, "Scrum");
        assert_eq!(rules.soft_skills.len(), 4);
        assert!(rules.soft_skills.iter().all(|r| r.weight == 5));
    }

    #[test]
    fn test_matching_is_substring() {
        let rules = RuleSet::default();
        let tags: Vec<_> = matching_rules(&rules.skills, "i love javascripting")
            .map(|r| r.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["JavaScript", "Java"]);
    }

    #[test]
    fn test_soft_skill_phrase_needs_exact_phrase() {
        let rules = RuleSet::default();
        assert_eq!(
            matching_rules(&rules.soft_skills, "problem-solving").count(),
            0
        );
        assert_eq!(
            matching_rules(&rules.soft_skills, "strong problem solving").count(),
            1
        );
    }

    #[test]
    fn test_from_json_lowercases_keywords() {
        let rules = RuleSet::from_json_str(
            r#"{"skills": [{"keyword": "  Rust ", "tag": "Rust", "weight": 20}]}"#,
        )
        .unwrap();
        assert_eq!(rules.skills[0].keyword, "rust");
        assert!(rules.soft_skills.is_empty());
    }

    #[test]
    fn test_from_json_rejects_empty_keyword() {
        let err = RuleSet::from_json_str(
            r#"{"skills": [{"keyword": " ", "tag": "Rust", "weight": 20}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty keyword"), "{err}");
    }

    #[test]
    fn test_from_json_rejects_empty_tag() {
        assert!(RuleSet::from_json_str(
            r#"{"skills": [{"keyword": "go", "tag": "", "weight": 5}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"skills": [{{"keyword": "Kotlin", "tag": "Kotlin", "weight": 12}}],
                "soft_skills": [{{"keyword": "empathy", "tag": "Empathy", "weight": 5}}]}}"#
        )
        .unwrap();

        let rules = RuleSet::from_json_file(file.path()).unwrap();
        assert_eq!(rules.skills[0].keyword, "kotlin");
        assert_eq!(rules.soft_skills[0].tag, "Empathy");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = RuleSet::from_json_file(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read rule set"));
    }

    #[test]
    fn test_default_rules_is_shared() {
        assert!(std::ptr::eq(default_rules(), default_rules()));
    }
}
