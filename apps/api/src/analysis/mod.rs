// CV analysis: rule-based scoring of candidature CVs.
// Engine layers, leaves first: rules → tiers → advisor → engine.
// Everything under engine is pure; only `store` does I/O.

pub mod advisor;
pub mod engine;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod ranking;
pub mod rules;
pub mod store;
pub mod tiers;

pub use engine::{analyze, CvScorer, KeywordCvScorer};
pub use models::{AnalysisInput, AnalysisResult, ScoreBand};
