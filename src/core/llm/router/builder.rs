//! LLM Router Builder

use std::sync::Arc;
use std::time::Duration;

use super::config::RouterConfig;
use super::provider::LLMProvider;
use super::LLMRouter;

/// Builder for constructing an LLMRouter
pub struct LLMRouterBuilder {
    config: RouterConfig,
    providers: Vec<Arc<dyn LLMProvider>>,
}

impl LLMRouterBuilder {
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            providers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Providers are tried in the order they are added.
    pub fn add_provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.config.enable_fallback = enabled;
        self
    }

    pub fn with_rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.config.rate_limit_backoff = backoff;
        self
    }

    pub fn with_default_temperature(mut self, temperature: Option<f32>) -> Self {
        self.config.default_temperature = temperature;
        self
    }

    pub async fn build(self) -> LLMRouter {
        let mut router = LLMRouter::new(self.config);
        for provider in self.providers {
            router.add_provider(provider).await;
        }
        router
    }
}

impl Default for LLMRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
