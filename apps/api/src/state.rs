use std::sync::Arc;

use crate::config::Config;
use crate::language::LanguageDetector;
use crate::llm_client::TextGenerator;
use crate::prompts::PromptStore;
use crate::rate_limiter::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub prompts: Arc<PromptStore>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Pluggable detector. Default: WhatlangDetector.
    pub detector: Arc<dyn LanguageDetector>,
    /// Chat-completion backend. Default: the lazily-initialised LlmClient.
    pub llm: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        config: Config,
        detector: Arc<dyn LanguageDetector>,
        llm: Arc<dyn TextGenerator>,
    ) -> Self {
        let prompts = PromptStore::new(config.prompts_path.clone(), config.prompts_reload);
        let rate_limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_window);

        Self {
            config: Arc::new(config),
            prompts: Arc::new(prompts),
            rate_limiter: Arc::new(rate_limiter),
            detector,
            llm,
        }
    }
}
