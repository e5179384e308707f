//! LLM Provider Router
//!
//! Ordered fallback across LLM providers:
//! - Unified `LLMProvider` trait for all providers
//! - Providers are tried in registration order
//! - Rate-limited attempts pause before moving on
//! - Per-provider request statistics
//! - Streaming support

mod builder;
mod config;
mod error;
mod provider;
mod stats;
mod types;


// Re-export public API
pub use builder::LLMRouterBuilder;
pub use config::RouterConfig;
pub use error::{LLMError, Result};
pub use provider::LLMProvider;
pub use stats::ProviderStats;
pub use types::{ChatChunk, ChatMessage, ChatRequest, ChatResponse, MessageRole, ToolCall};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;

// ============================================================================
// LLM Router
// ============================================================================

/// Main router for LLM providers
#[derive(Clone)]
pub struct LLMRouter {
    /// Registered providers by ID
    providers: HashMap<String, Arc<dyn LLMProvider>>,
    /// Provider priority order
    provider_order: Vec<String>,
    /// Statistics per provider
    stats: Arc<RwLock<HashMap<String, ProviderStats>>>,
    /// Configuration
    config: RouterConfig,
}

impl LLMRouter {
    /// Create a new router with configuration
    pub fn new(config: RouterConfig) -> Self {
        Self {
            providers: HashMap::new(),
            provider_order: Vec::new(),
            stats: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(RouterConfig::default())
    }

    /// Builder for creating a router
    pub fn builder() -> LLMRouterBuilder {
        LLMRouterBuilder::new()
    }

    /// Register a provider
    pub async fn add_provider(&mut self, provider: Arc<dyn LLMProvider>) {
        let id = provider.id().to_string();

        self.providers.insert(id.clone(), provider);

        if !self.provider_order.contains(&id) {
            self.provider_order.push(id.clone());
        }

        self.stats
            .write()
            .await
            .insert(id, ProviderStats::default());
    }

    /// Remove a provider
    pub async fn remove_provider(&mut self, id: &str) {
        self.providers.remove(id);
        self.provider_order.retain(|p| p != id);
        self.stats.write().await.remove(id);
    }

    /// Get provider IDs in priority order
    pub fn provider_ids(&self) -> Vec<String> {
        self.provider_order.clone()
    }

    /// Get a provider by ID
    pub fn get_provider(&self, id: &str) -> Option<Arc<dyn LLMProvider>> {
        self.providers.get(id).cloned()
    }

    /// The first provider in priority order
    pub fn primary(&self) -> Option<Arc<dyn LLMProvider>> {
        self.provider_order
            .first()
            .and_then(|id| self.providers.get(id).cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Get stats for a provider
    pub async fn get_stats(&self, id: &str) -> Option<ProviderStats> {
        self.stats.read().await.get(id).cloned()
    }

    /// Get all provider stats
    pub async fn get_all_stats(&self) -> HashMap<String, ProviderStats> {
        self.stats.read().await.clone()
    }

    /// Get router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    fn apply_defaults(&self, mut request: ChatRequest) -> ChatRequest {
        if request.temperature.is_none() {
            request.temperature = self.config.default_temperature;
        }
        request
    }

    async fn record_success(&self, id: &str, response: &ChatResponse) {
        if let Some(stats) = self.stats.write().await.get_mut(id) {
            stats.record_success(
                response.latency_ms,
                response.usage.as_ref(),
                response.cost_usd.unwrap_or(0.0),
            );
        }
    }

    async fn record_failure(&self, id: &str, rate_limited: bool) {
        if let Some(stats) = self.stats.write().await.get_mut(id) {
            stats.record_failure(rate_limited);
        }
    }

    /// Providers to attempt for a request. An explicit `request.provider`
    /// restricts the attempt to that single provider.
    fn providers_for(&self, request: &ChatRequest) -> Vec<Arc<dyn LLMProvider>> {
        match request.provider {
            Some(ref requested) => self.providers.get(requested).cloned().into_iter().collect(),
            None => self
                .provider_order
                .iter()
                .filter_map(|id| self.providers.get(id).cloned())
                .collect(),
        }
    }

    /// Send a chat request with ordered fallback
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let request = self.apply_defaults(request);
        let providers = self.providers_for(&request);
        let mut last_error: Option<LLMError> = None;
        let total = providers.len();

        for (position, provider) in providers.into_iter().enumerate() {
            let id = provider.id().to_string();
            let start = Instant::now();

            let result = timeout(self.config.request_timeout, provider.chat(request.clone())).await;

            let err = match result {
                Ok(Ok(mut response)) => {
                    if response.latency_ms == 0 {
                        response.latency_ms = start.elapsed().as_millis() as u64;
                    }
                    self.record_success(&id, &response).await;
                    log::info!("Chat succeeded with provider {} ({}ms)", id, response.latency_ms);
                    return Ok(response);
                }
                Ok(Err(e)) => e,
                Err(_) => LLMError::Timeout,
            };

            let rate_limited = err.is_rate_limited();
            self.record_failure(&id, rate_limited).await;
            log::warn!("Chat failed with provider {}: {}", id, err);
            last_error = Some(err);

            if !self.config.enable_fallback {
                break;
            }

            let has_next = position + 1 < total;
            if rate_limited && has_next && !self.config.rate_limit_backoff.is_zero() {
                log::debug!(
                    "Rate limited by {}, waiting {:?} before next provider",
                    id,
                    self.config.rate_limit_backoff
                );
                tokio::time::sleep(self.config.rate_limit_backoff).await;
            }
        }

        Err(last_error.unwrap_or(LLMError::NoProvidersAvailable))
    }

    /// Send a streaming chat request to the first provider that accepts it
    pub async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> Result<mpsc::Receiver<Result<ChatChunk>>> {
        let request = self.apply_defaults(request);
        let providers = self.providers_for(&request);
        let mut last_error: Option<LLMError> = None;

        for provider in providers {
            let id = provider.id().to_string();
            if !provider.supports_streaming() {
                last_error = Some(LLMError::StreamingNotSupported(id));
                continue;
            }

            match timeout(self.config.request_timeout, provider.stream_chat(request.clone())).await
            {
                Ok(Ok(rx)) => return Ok(rx),
                Ok(Err(e)) => {
                    self.record_failure(&id, e.is_rate_limited()).await;
                    log::warn!("Stream failed to start with provider {}: {}", id, e);
                    last_error = Some(e);
                }
                Err(_) => {
                    self.record_failure(&id, false).await;
                    last_error = Some(LLMError::Timeout);
                }
            }

            if !self.config.enable_fallback {
                break;
            }
        }

        Err(last_error.unwrap_or(LLMError::NoProvidersAvailable))
    }

    /// Generate embeddings with the first provider that supports them
    pub async fn embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let mut last_error: Option<LLMError> = None;
        for id in &self.provider_order {
            let Some(provider) = self.providers.get(id) else {
                continue;
            };
            if !provider.supports_embeddings() {
                continue;
            }
            match provider.embeddings(text.to_string()).await {
                Ok(vector) => return Ok(vector),
                Err(e) => {
                    log::warn!("Embedding failed with provider {}: {}", id, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(LLMError::NoProvidersAvailable))
    }

    /// Run health checks on all providers
    pub async fn health_check_all(&self) -> HashMap<String, bool> {
        let mut results = HashMap::new();
        for (id, provider) in &self.providers {
            results.insert(id.clone(), provider.health_check().await);
        }
        results
    }
}
