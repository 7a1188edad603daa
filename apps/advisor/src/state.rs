use std::sync::Arc;

use crate::catalog::CatalogRepository;
use crate::llm_client::TextGenerator;
use crate::retrieval::CaseRetriever;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only reference data, loaded lazily and reloaded when the CSV files change.
    pub catalog: Arc<CatalogRepository>,
    /// Pluggable case retriever. Default: KeywordRetriever (top 3).
    pub retriever: Arc<dyn CaseRetriever>,
    /// The model behind the recommendation. Default: LlmClient (Gemini).
    pub generator: Arc<dyn TextGenerator>,
}
