use std::sync::Arc;

use crate::analysis::engine::{CvScorer, KeywordCvScorer};
use crate::analysis::store::{AnalysisStore, InMemoryAnalysisStore};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable CV scorer. Default: KeywordCvScorer over the configured rule set.
    pub scorer: Arc<dyn CvScorer>,
    /// PostgreSQL when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn AnalysisStore>,
}

impl AppState {
    /// Built-in rules, in-memory store.
    pub fn in_memory(config: Config) -> Self {
        Self {
            config,
            scorer: Arc::new(KeywordCvScorer::default()),
            store: Arc::new(InMemoryAnalysisStore::default()),
        }
    }
}
