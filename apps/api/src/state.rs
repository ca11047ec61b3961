use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend selected by `LLM_PROVIDER`. Swapped for a mock in tests.
    pub llm: Arc<dyn CompletionBackend>,
    pub config: Config,
}
