use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::interview::store::SessionStore;
use crate::llm_client::ModelGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Production: `LlmClient`. Tests swap in a scripted gateway.
    pub gateway: Arc<dyn ModelGateway>,
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
