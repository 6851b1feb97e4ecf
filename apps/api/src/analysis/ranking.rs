//! Screening helpers for the HR candidatures view: ranking, score distribution
//! and free-text search.

use serde::{Deserialize, Serialize};

/// Candidate counts per screening bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub total: usize,
    pub excellent: usize, // ≥ 80
    pub good: usize,      // 60 – 79
    pub average: usize,   // < 60
}

impl ScoreDistribution {
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        scores
            .into_iter()
            .fold(ScoreDistribution::default(), |mut dist, score| {
                dist.total += 1;
                match score {
                    s if s >= 80 => dist.excellent += 1,
                    s if s >= 60 => dist.good += 1,
                    _ => dist.average += 1,
                }
                dist
            })
    }
}

/// Sorts highest score first. Ties keep their input order.
pub fn rank_by_score<T>(items: &mut [T], score: impl Fn(&T) -> u32) {
    items.sort_by_key(|item| std::cmp::Reverse(score(item)));
}

/// Case-insensitive substring search over `fields`. A blank term matches everything.
pub fn matches_search(term: Option<&str>, fields: &[&str]) -> bool {
    let term = match term.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return true,
    };
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}
