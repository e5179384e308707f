//! Google Provider Implementation (API Key-based)
//!
//! Gemini models through the Generative Language API: chat with function
//! calling, SSE streaming, embeddings and model listing.

use crate::core::llm::cost::{ProviderPricing, TokenUsage};
use crate::core::llm::router::{
    ChatChunk, ChatMessage, ChatRequest, ChatResponse, LLMError, LLMProvider, MessageRole,
    Result, ToolCall,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// A model advertised by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub supported_generation_methods: Vec<String>,
}

/// Google provider (API key-based)
pub struct GoogleProvider {
    id: String,
    api_key: String,
    model: String,
    embedding_model: String,
    base_url: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| Client::new());

        // Trim the API key at construction to ensure consistency with validation
        Self {
            id: "google".to_string(),
            api_key: api_key.into().trim().to_string(),
            model: model.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    pub fn flash(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_CHAT_MODEL)
    }

    /// Router id; several models behind one key need distinct ids.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(client) = Client::builder().timeout(timeout).build() {
            self.client = client;
        }
        self
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Check if an API key has valid Google API key format.
    ///
    /// Google API keys start with "AIza". This is a pure format check
    /// and does not verify the key with Google's API.
    pub fn is_valid_api_key_format(key: &str) -> bool {
        let trimmed = key.trim();
        !trimmed.is_empty() && trimmed.starts_with("AIza")
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    /// Gemini `contents`; consecutive tool results share one user turn.
    fn build_contents(&self, messages: &[ChatMessage]) -> Vec<Value> {
        let mut contents: Vec<Value> = Vec::new();
        let mut previous_was_tool = false;

        for msg in messages {
            match msg.role {
                MessageRole::System => continue,
                MessageRole::User => contents.push(json!({
                    "role": "user",
                    "parts": [{ "text": msg.content }]
                })),
                MessageRole::Assistant => {
                    let mut parts = Vec::new();
                    if !msg.content.is_empty() {
                        parts.push(json!({ "text": msg.content }));
                    }
                    for call in msg.tool_calls.iter().flatten() {
                        parts.push(json!({
                            "functionCall": { "name": call.name, "args": call.args }
                        }));
                    }
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
                MessageRole::Tool => {
                    let part = json!({
                        "functionResponse": {
                            "name": msg.name.clone().unwrap_or_default(),
                            "response": function_response_payload(&msg.content)
                        }
                    });
                    let merged = previous_was_tool
                        && contents
                            .last_mut()
                            .and_then(|last| last["parts"].as_array_mut())
                            .map(|parts| parts.push(part.clone()))
                            .is_some();
                    if !merged {
                        contents.push(json!({ "role": "user", "parts": [part] }));
                    }
                }
            }
            previous_was_tool = msg.role == MessageRole::Tool;
        }
        contents
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({ "contents": self.build_contents(&request.messages) });

        if let Some(system) = &request.system_prompt {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        if request.temperature.is_some() || request.max_tokens.is_some() {
            let mut gen_config = serde_json::Map::new();
            if let Some(temp) = request.temperature {
                gen_config.insert("temperature".to_string(), json!(temp));
            }
            if let Some(max) = request.max_tokens {
                gen_config.insert("maxOutputTokens".to_string(), json!(max));
            }
            body["generationConfig"] = Value::Object(gen_config);
        }

        if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
            body["tools"] = json!([{ "functionDeclarations": tools }]);
        }

        if let Some(choice) = &request.tool_choice {
            if let Some(config) = function_calling_config(choice) {
                body["toolConfig"] = json!({ "functionCallingConfig": config });
            }
        }

        body
    }

    async fn post(&self, url: &str, body: &Value) -> Result<reqwest::Response> {
        let resp = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        error_for_status(resp).await
    }

    /// Models that support `generateContent`
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/v1beta/models", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        let json: Value = error_for_status(resp).await?.json().await?;

        let models = json["models"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .map(|m| ModelInfo {
                        name: m["name"].as_str().unwrap_or_default().to_string(),
                        display_name: m["displayName"].as_str().map(str::to_string),
                        supported_generation_methods: m["supportedGenerationMethods"]
                            .as_array()
                            .map(|methods| {
                                methods
                                    .iter()
                                    .filter_map(|v| v.as_str().map(str::to_string))
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .filter(|m| {
                        m.supported_generation_methods
                            .iter()
                            .any(|method| method == "generateContent")
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }
}

/// Gemini wants an object in `functionResponse.response`.
fn function_response_payload(content: &str) -> Value {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => json!({ "result": other }),
        Err(_) => json!({ "result": content }),
    }
}

fn function_calling_config(choice: &Value) -> Option<Value> {
    match choice {
        Value::String(mode) => {
            let mode = match mode.to_ascii_lowercase().as_str() {
                "any" | "required" => "ANY",
                "none" => "NONE",
                "auto" => "AUTO",
                _ => return None,
            };
            Some(json!({ "mode": mode }))
        }
        Value::Object(map) => map
            .get("name")
            .and_then(|n| n.as_str())
            .map(|name| json!({ "mode": "ANY", "allowedFunctionNames": [name] })),
        _ => None,
    }
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let retry_after_secs = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let text = resp.text().await.unwrap_or_default();

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimited { retry_after_secs },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::AuthError(text),
        _ => LLMError::ApiError {
            status: status.as_u16(),
            message: text,
        },
    })
}

fn parse_usage(json: &Value) -> Option<TokenUsage> {
    json["usageMetadata"].as_object().map(|u| TokenUsage {
        input_tokens: u["promptTokenCount"].as_u64().unwrap_or(0) as u32,
        output_tokens: u["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
    })
}

/// Text and function calls of the first candidate
fn parse_candidate(json: &Value) -> Result<(String, Vec<ToolCall>, Option<String>)> {
    let candidate = json["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates");
            LLMError::InvalidResponse(format!("Missing candidates: {}", reason))
        })?;

    let mut text = String::new();
    let mut calls = Vec::new();
    for part in candidate["content"]["parts"].as_array().into_iter().flatten() {
        if let Some(t) = part["text"].as_str() {
            text.push_str(t);
        }
        if let Some(fc) = part.get("functionCall") {
            if let Some(name) = fc["name"].as_str() {
                let args = fc.get("args").cloned().unwrap_or_else(|| json!({}));
                calls.push(ToolCall::new(name, args));
            }
        }
    }

    let finish_reason = candidate["finishReason"].as_str().map(str::to_string);

    if text.is_empty() && calls.is_empty() {
        return Err(LLMError::InvalidResponse("Missing content".to_string()));
    }

    Ok((text, calls, finish_reason))
}

#[async_trait]
impl LLMProvider for GoogleProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> bool {
        // Early return on obviously invalid key format
        if !Self::is_valid_api_key_format(&self.api_key) {
            return false;
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": "ping" }] }],
            "generationConfig": { "maxOutputTokens": 1 }
        });

        self.post(&self.model_url(&self.model, "generateContent"), &body)
            .await
            .is_ok()
    }

    fn pricing(&self) -> Option<ProviderPricing> {
        ProviderPricing::for_model("google", &self.model)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.model_url(&self.model, "generateContent");
        let body = self.build_body(&request);

        let start = std::time::Instant::now();
        let resp = self.post(&url, &body).await?;
        let json: Value = resp.json().await?;
        let latency = start.elapsed().as_millis() as u64;

        let (content, calls, finish_reason) = parse_candidate(&json)?;
        let usage = parse_usage(&json);
        let cost = usage
            .as_ref()
            .and_then(|u| self.pricing().map(|p| p.calculate_cost(u)));

        Ok(ChatResponse {
            content,
            model: self.model.clone(),
            provider: self.id.clone(),
            usage,
            finish_reason,
            latency_ms: latency,
            cost_usd: cost,
            tool_calls: (!calls.is_empty()).then_some(calls),
        })
    }

    async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> Result<mpsc::Receiver<Result<ChatChunk>>> {
        let url = self.model_url(&self.model, "streamGenerateContent?alt=sse");
        let body = self.build_body(&request);
        let response = self.post(&url, &body).await?;

        let stream_id = uuid::Uuid::new_v4().to_string();
        let model = self.model.clone();
        let provider = self.id.clone();
        let (tx, rx) = mpsc::channel(100);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut chunk_index = 0u32;
            let mut final_usage: Option<TokenUsage> = None;
            // SSE buffer to handle TCP chunk boundaries
            let mut sse_buffer = String::new();
            let mut stream_done = false;

            let make_chunk = |content: String, index: u32, finish: Option<String>, usage| ChatChunk {
                stream_id: stream_id.clone(),
                content,
                provider: provider.clone(),
                model: model.clone(),
                is_final: finish.is_some(),
                finish_reason: finish,
                usage,
                index,
            };

            loop {
                let line = match sse_buffer.find('\n') {
                    Some(pos) => {
                        let line = sse_buffer[..pos].trim_end_matches('\r').to_string();
                        sse_buffer.drain(..=pos);
                        line
                    }
                    None if stream_done => break,
                    None => match stream.next().await {
                        Some(Ok(bytes)) => {
                            sse_buffer.push_str(&String::from_utf8_lossy(&bytes));
                            continue;
                        }
                        Some(Err(e)) => {
                            let _ = tx.send(Err(LLMError::HttpError(e))).await;
                            return;
                        }
                        None => {
                            stream_done = true;
                            std::mem::take(&mut sse_buffer)
                        }
                    },
                };

                let Some(data) = line.trim().strip_prefix("data: ") else {
                    continue;
                };
                let Ok(json) = serde_json::from_str::<Value>(data) else {
                    continue;
                };

                if let Some(text) = json["candidates"][0]["content"]["parts"][0]["text"].as_str() {
                    if !text.is_empty() {
                        chunk_index += 1;
                        let chunk = make_chunk(text.to_string(), chunk_index, None, None);
                        if tx.send(Ok(chunk)).await.is_err() {
                            return;
                        }
                    }
                }

                if let Some(usage) = parse_usage(&json) {
                    final_usage = Some(usage);
                }

                if let Some(reason) = json["candidates"][0]["finishReason"].as_str() {
                    let chunk = make_chunk(
                        String::new(),
                        chunk_index + 1,
                        Some(reason.to_string()),
                        final_usage.clone(),
                    );
                    let _ = tx.send(Ok(chunk)).await;
                    return;
                }
            }

            // Stream ended without an explicit finish reason
            let chunk = make_chunk(
                String::new(),
                chunk_index + 1,
                Some("stop".to_string()),
                final_usage,
            );
            let _ = tx.send(Ok(chunk)).await;
        });

        Ok(rx)
    }

    async fn embeddings(&self, text: String) -> Result<Vec<f32>> {
        let url = self.model_url(&self.embedding_model, "embedContent");
        let body = json!({
            "model": format!("models/{}", self.embedding_model),
            "content": { "parts": [{ "text": text }] }
        });

        let json: Value = self.post(&url, &body).await?.json().await?;
        let values: Vec<f32> = json["embedding"]["values"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect()
            })
            .unwrap_or_default();

        if values.is_empty() {
            return Err(LLMError::EmbeddingError(
                "Response contained no embedding values".to_string(),
            ));
        }
        Ok(values)
    }

    fn supports_embeddings(&self) -> bool {
        true
    }
}
