//! Shared helpers for the integration tests.
//!
//! Gemini and Wikipedia are both served by wiremock so nothing here needs
//! network access or an API key.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use curio::config::{LlmConfig, WikiConfig};
use curio::core::llm::{build_router, LLMRouter};
use curio::core::wiki::WikipediaClient;

pub const PRIMARY_MODEL: &str = "gemini-2.5-flash";
pub const BACKUP_MODEL: &str = "gemini-1.5-flash";

pub fn generate_path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

/// A `generateContent` reply with one text part.
pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 20, "candidatesTokenCount": 8 }
    })
}

/// A `generateContent` reply asking for one function call.
pub fn function_call_reply(name: &str, args: Value) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{
                "functionCall": { "name": name, "args": args }
            }]},
            "finishReason": "STOP"
        }]
    })
}

/// Primary and backup models, both pointed at `base_url`, without backoff.
pub fn llm_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("AIzaIntegrationKey".to_string()),
        chat_models: vec![PRIMARY_MODEL.to_string(), BACKUP_MODEL.to_string()],
        base_url: base_url.to_string(),
        rate_limit_backoff_ms: 0,
        request_timeout_secs: 5,
        ..LlmConfig::default()
    }
}

pub async fn router_from(config: &LlmConfig) -> Arc<LLMRouter> {
    Arc::new(build_router(config).await.expect("router config should be valid"))
}

pub async fn gemini_router(base_url: &str) -> Arc<LLMRouter> {
    router_from(&llm_config(base_url)).await
}

pub fn wiki_client(base_url: &str) -> Arc<WikipediaClient> {
    let client = WikipediaClient::new(&WikiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        user_agent: "curio-integration".to_string(),
    })
    .expect("wiki client should build");
    Arc::new(client)
}
