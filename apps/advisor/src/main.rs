mod catalog;
mod config;
mod errors;
mod llm_client;
mod models;
mod prompt;
mod recommendation;
mod retrieval;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::CatalogRepository;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::retrieval::KeywordRetriever;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast when GOOGLE_API_KEY is missing)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting curriculum advisor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.google_api_key.clone(), &config.gemini_base_url)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Reference data is loaded once here and reloaded when the CSV files change
    let catalog = Arc::new(CatalogRepository::new(config.data.clone()));
    info!("Reading reference data from {}", catalog.sources().data_dir.display());
    let snapshot = catalog.snapshot().await;
    info!(
        "Reference data ready: {} courses, {} tracks, {} cases",
        snapshot.catalog.len(),
        snapshot.tracks.len(),
        snapshot.cases.len()
    );
    for diagnostic in &snapshot.diagnostics {
        warn!("{:?}: {}", diagnostic.source, diagnostic.message);
    }

    // Build app state
    let state = AppState {
        catalog,
        retriever: Arc::new(KeywordRetriever::default()),
        generator: Arc::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
