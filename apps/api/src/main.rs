use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stage_api::analysis::rules::RuleSet;
use stage_api::analysis::store::PgAnalysisStore;
use stage_api::analysis::KeywordCvScorer;
use stage_api::config::Config;
use stage_api::db::create_pool;
use stage_api::routes::build_router;
use stage_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("stage_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stage API v{}", env!("CARGO_PKG_VERSION"));

    let mut state = AppState::in_memory(config.clone());

    // Rule tables: built-in unless CV_RULES_PATH points at a JSON rule set
    if let Some(path) = &config.rules_path {
        let scorer = KeywordCvScorer::new(RuleSet::from_json_file(path)?);
        info!(
            "Loaded CV rule set from {} ({} skill rules, {} soft-skill rules)",
            path.display(),
            scorer.rules().skills.len(),
            scorer.rules().soft_skills.len()
        );
        state.scorer = Arc::new(scorer);
    }
    info!("CV scorer initialized (backend: {})", state.scorer.backend());

    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            state.store = Arc::new(PgAnalysisStore::new(pool));
        }
        None => warn!("DATABASE_URL not set; analyses are kept in memory only"),
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
