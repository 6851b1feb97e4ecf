use crate::analysis::tiers::{contains_any, ExperienceTier};

pub const EXPAND_EXPERIENCE: &str = "Expand professional experience";
pub const DEVELOP_SKILLS: &str = "Further develop technical skills";
pub const ADD_PORTFOLIO: &str = "Include references or a portfolio";

const MIN_SKILL_COUNT: usize = 3;
const MAX_IMPROVEMENTS: usize = 3;
const PORTFOLIO_KEYWORDS: &[&str] = &["portfolio", "github"];

/// Improvement notes in fixed check order.
/// `skill_count` is the deduplicated tag count.
pub fn advise(folded: &str, experience: ExperienceTier, skill_count: usize) -> Vec<String> {
    let mut notes = Vec::new();

    if experience == ExperienceTier::Beginner {
        notes.push(EXPAND_EXPERIENCE.to_string());
    }
    if skill_count < MIN_SKILL_COUNT {
        notes.push(DEVELOP_SKILLS.to_string());
    }
    if !contains_any(folded, PORTFOLIO_KEYWORDS) {
        notes.push(ADD_PORTFOLIO.to_string());
    }

    notes.truncate(MAX_IMPROVEMENTS);
    notes
}
