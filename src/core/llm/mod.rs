//! LLM Client Module
//!
//! Unified interface to Gemini with:
//! - Ordered model fallback and rate-limit backoff
//! - Function calling, streaming and embeddings
//! - Cost tracking
//!
//! # Module Structure
//!
//! - `router`: Main router and `LLMProvider` trait
//! - `cost`: Token usage and pricing
//! - `providers`: Provider implementations

pub mod cost;
pub mod providers;
pub mod router;

pub use cost::{ProviderPricing, TokenUsage};
pub use providers::{GoogleProvider, ModelInfo};
pub use router::{
    ChatChunk, ChatMessage, ChatRequest, ChatResponse, LLMError, LLMProvider, LLMRouter,
    LLMRouterBuilder, MessageRole, ProviderStats, Result, RouterConfig, ToolCall,
};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, LlmConfig};

// ============================================================================
// Convenience Functions
// ============================================================================

/// One Gemini provider per configured chat model, in fallback order.
///
/// Provider ids are `google:{model}` so the router can tell them apart.
pub fn google_providers(config: &LlmConfig) -> std::result::Result<Vec<GoogleProvider>, ConfigError> {
    let api_key = config.api_key()?;

    Ok(config
        .chat_models
        .iter()
        .map(|model| {
            GoogleProvider::new(api_key, model.as_str())
                .with_id(format!("google:{}", model))
                .with_base_url(config.base_url.as_str())
                .with_embedding_model(config.embedding_model.as_str())
                .with_timeout(Duration::from_secs(config.request_timeout_secs))
        })
        .collect())
}

/// Build the fallback router described by `config`.
pub async fn build_router(config: &LlmConfig) -> std::result::Result<LLMRouter, ConfigError> {
    let router_config = RouterConfig {
        request_timeout: Duration::from_secs(config.request_timeout_secs),
        enable_fallback: true,
        rate_limit_backoff: Duration::from_millis(config.rate_limit_backoff_ms),
        default_temperature: config.temperature,
    };

    let mut builder = LLMRouter::builder().with_config(router_config);
    for provider in google_providers(config)? {
        builder = builder.add_provider(Arc::new(provider));
    }
    Ok(builder.build().await)
}
