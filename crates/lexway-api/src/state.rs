//! Application state shared across all route handlers.
//!
//! AppState holds the provider boundary, the session store, and the
//! services built on top of them. It is passed to handlers via axum's
//! State extractor; all fields use `Arc` for cheap cloning across tasks.

use std::sync::Arc;
use std::time::Instant;

use lexway_chat::ChatEngine;
use lexway_core::config::LexwayConfig;
use lexway_docs::{DocAnalyzer, TextExtractor};
use lexway_provider::ProviderAdapter;
use lexway_store::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<LexwayConfig>,
    /// External LLM/file service boundary.
    pub provider: Arc<dyn ProviderAdapter>,
    /// Conversation persistence.
    pub store: Arc<dyn SessionStore>,
    /// Phase-gated chat engine.
    pub engine: Arc<ChatEngine>,
    /// Document analysis flow.
    pub analyzer: Arc<DocAnalyzer>,
    /// Text extraction flow.
    pub extractor: Arc<TextExtractor>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState wiring the services to the given provider
    /// and store.
    pub fn new(
        config: LexwayConfig,
        provider: Arc<dyn ProviderAdapter>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let engine = Arc::new(ChatEngine::new(Arc::clone(&provider), Arc::clone(&store)));
        let analyzer = Arc::new(DocAnalyzer::new(Arc::clone(&provider)));
        let extractor = Arc::new(TextExtractor::new(Arc::clone(&provider)));
        Self {
            config: Arc::new(config),
            provider,
            store,
            engine,
            analyzer,
            extractor,
            start_time: Instant::now(),
        }
    }
}
