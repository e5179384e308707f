//! Mock implementations for testing
//!
//! [`ScriptedProvider`] answers chat requests with a closure so tests can
//! route prompts to canned replies and inspect what was sent.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::llm::{
    ChatChunk, ChatRequest, ChatResponse, LLMError, LLMProvider, LLMRouter, ProviderPricing,
    Result, ToolCall,
};

type Responder = dyn Fn(&ChatRequest) -> Result<String> + Send + Sync;

pub struct ScriptedProvider {
    id: String,
    responder: Box<Responder>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    embedding: Option<Vec<f32>>,
    embedded: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(responder: impl Fn(&ChatRequest) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            id: "scripted".to_string(),
            responder: Box::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
            embedding: None,
            embedded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every embedding request with `vector`.
    pub fn with_embedding(mut self, vector: Vec<f32>) -> Self {
        self.embedding = Some(vector);
        self
    }

    /// Handle to every text sent for embedding, in order.
    pub fn embedded(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.embedded)
    }

    /// Always reply with `text`.
    pub fn constant(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Handle to every request received, in order.
    pub fn requests(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        Arc::clone(&self.requests)
    }
}

/// Text of the last user message in a request.
pub fn last_user_text(request: &ChatRequest) -> &str {
    request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

pub fn api_error() -> LLMError {
    LLMError::ApiError {
        status: 503,
        message: "upstream unavailable".to_string(),
    }
}

/// Router with a single scripted provider and no backoff.
pub async fn scripted_router(provider: ScriptedProvider) -> Arc<LLMRouter> {
    Arc::new(
        LLMRouter::builder()
            .with_rate_limit_backoff(std::time::Duration::ZERO)
            .add_provider(Arc::new(provider))
            .build()
            .await,
    )
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn pricing(&self) -> Option<ProviderPricing> {
        None
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let outcome = (self.responder)(&request);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        outcome.map(|content| ChatResponse {
            content,
            model: "scripted-model".to_string(),
            provider: self.id.clone(),
            usage: None,
            finish_reason: Some("STOP".to_string()),
            latency_ms: 1,
            cost_usd: None,
            tool_calls: None::<Vec<ToolCall>>,
        })
    }

    async fn stream_chat(&self, _request: ChatRequest) -> Result<mpsc::Receiver<Result<ChatChunk>>> {
        Err(LLMError::StreamingNotSupported(self.id.clone()))
    }

    async fn embeddings(&self, text: String) -> Result<Vec<f32>> {
        if let Ok(mut embedded) = self.embedded.lock() {
            embedded.push(text);
        }
        self.embedding
            .clone()
            .ok_or_else(|| LLMError::EmbeddingNotSupported(self.id.clone()))
    }

    fn supports_streaming(&self) -> bool {
        false
    }

    fn supports_embeddings(&self) -> bool {
        self.embedding.is_some()
    }
}
