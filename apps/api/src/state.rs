use std::sync::Arc;

use crate::config::Config;
use crate::matching::embedder::Embedder;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: JsonFileStore. Swap via STORE_BACKEND.
    pub store: Arc<dyn ResumeStore>,
    /// Pluggable embedder. Default: DigestEmbedder.
    pub embedder: Arc<dyn Embedder>,
    pub config: Config,
}
