use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use marquee_api::api::{create_router, AppState};
use marquee_api::catalog::{CatalogStore, JsonFileSource};
use marquee_api::config::Config;
use marquee_api::services::RecommendationEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Build the engine before accepting traffic; a bad catalog is fatal
    let source = JsonFileSource::new(&config.catalog_path);
    let catalog = CatalogStore::load(&source, config.embedding_dim)
        .await
        .context("Failed to load catalog")?;
    let ranker = config.ranker()?;
    tracing::info!(
        similarity_weight = ranker.weights().similarity(),
        popularity_weight = ranker.weights().popularity(),
        popularity_scheme = ranker.popularity_scheme(),
        resolver_threshold = config.resolver_threshold,
        "Recommendation engine configured"
    );
    let engine = RecommendationEngine::new(Arc::new(catalog), config.resolver()?, ranker);

    let state = AppState::new(engine, config.request_defaults());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
