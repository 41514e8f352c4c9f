use std::sync::Arc;

use crate::config::Config;
use crate::generation::cache::TweetCache;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion backend. Production: OpenRouterClient. Tests swap in a mock.
    pub provider: Arc<dyn CompletionProvider>,
    /// Process-wide generation cache, created at startup.
    pub cache: Arc<TweetCache>,
    pub config: Config,
}
