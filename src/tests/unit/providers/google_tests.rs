//! Gemini Provider Unit Tests

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::llm::providers::GoogleProvider;
use crate::core::llm::router::{
    ChatChunk, ChatMessage, ChatRequest, LLMError, LLMProvider, ToolCall,
};

const MODEL: &str = "gemini-2.5-flash";
const KEY: &str = "AIzaTestApiKey";

fn provider(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new(KEY, MODEL).with_base_url(server.uri())
}

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 }
    })
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{MODEL}:generateContent")))
        .and(header("x-goog-api-key", KEY))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "Be Feynman." }] },
            "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Hi there!")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .chat(ChatRequest::prompt("Hello").with_system("Be Feynman."))
        .await
        .expect("chat failed");

    assert_eq!(response.content, "Hi there!");
    assert_eq!(response.model, MODEL);
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    let usage = response.usage.expect("usage missing");
    assert_eq!(usage.input_tokens, 12);
    assert_eq!(usage.output_tokens, 5);
    assert!(response.tool_calls.is_none());
}

#[tokio::test]
async fn test_chat_assistant_turns_use_model_role() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "Teach me" }] },
                { "role": "model", "parts": [{ "text": "Sure" }] },
                { "role": "user", "parts": [{ "text": "More" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::new(vec![
        ChatMessage::user("Teach me"),
        ChatMessage::assistant("Sure"),
        ChatMessage::user("More"),
    ]);
    provider(&server).chat(request).await.expect("chat failed");
}

#[tokio::test]
async fn test_function_call_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "toolConfig": {
                "functionCallingConfig": {
                    "mode": "ANY",
                    "allowedFunctionNames": ["log_user_intent"]
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{
                    "functionCall": {
                        "name": "log_user_intent",
                        "args": { "goal": "learn", "domain": "physics" }
                    }
                }]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let request = ChatRequest::prompt("I want to learn physics")
        .with_tools(vec![json!({ "name": "log_user_intent", "parameters": {} })])
        .with_tool_choice(json!({ "name": "log_user_intent" }));
    let response = provider(&server).chat(request).await.expect("chat failed");

    let call = response.first_tool_call().expect("no function call");
    assert_eq!(call.name, "log_user_intent");
    assert_eq!(call.arg_str("domain", "unknown"), "physics");
    assert_eq!(call.arg_str("user_stage", "unknown"), "unknown");
}

#[tokio::test]
async fn test_tool_results_sent_as_function_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "user" },
                { "role": "model", "parts": [
                    { "functionCall": { "name": "search_expert_database" } },
                    { "functionCall": { "name": "check_region_match" } }
                ]},
                { "role": "user", "parts": [
                    { "functionResponse": { "name": "search_expert_database", "response": { "result": [] } } },
                    { "functionResponse": { "name": "check_region_match", "response": { "matches": true } } }
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("done")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::new(vec![
        ChatMessage::user("find experts"),
        ChatMessage::assistant_tool_calls(
            "",
            vec![
                ToolCall::new("search_expert_database", json!({ "topic": "AI" })),
                ToolCall::new("check_region_match", json!({ "persona_name": "Yann LeCun" })),
            ],
        ),
        ChatMessage::tool_result("search_expert_database", "[]"),
        ChatMessage::tool_result("check_region_match", r#"{"matches": true}"#),
    ]);
    let response = provider(&server).chat(request).await.expect("chat failed");
    assert_eq!(response.content, "done");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_rate_limit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_string("quota exceeded"),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .chat(ChatRequest::prompt("Hello"))
        .await
        .expect_err("expected rate limit");
    assert!(matches!(err, LLMError::RateLimited { retry_after_secs: 7 }));
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_invalid_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .chat(ChatRequest::prompt("Hello"))
        .await
        .expect_err("expected auth error");
    assert!(matches!(err, LLMError::AuthError(ref msg) if msg.contains("API key not valid")));
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .chat(ChatRequest::prompt("Hello"))
        .await
        .expect_err("expected api error");
    assert!(matches!(err, LLMError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_blocked_prompt_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .chat(ChatRequest::prompt("Hello"))
        .await
        .expect_err("expected invalid response");
    assert!(matches!(err, LLMError::InvalidResponse(ref msg) if msg.contains("SAFETY")));
}

// =============================================================================
// Embeddings and models
// =============================================================================

#[tokio::test]
async fn test_embeddings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/text-embedding-004:embedContent"))
        .and(body_partial_json(json!({
            "model": "models/text-embedding-004",
            "content": { "parts": [{ "text": "photons" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": { "values": [0.25, -0.5, 1.0] }
        })))
        .mount(&server)
        .await;

    let vector = provider(&server)
        .embeddings("photons".to_string())
        .await
        .expect("embedding failed");
    assert_eq!(vector, vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn test_empty_embedding_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embedding": {} })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .embeddings("anything".to_string())
        .await
        .expect_err("expected embedding error");
    assert!(matches!(err, LLMError::EmbeddingError(_)));
}

#[tokio::test]
async fn test_list_models_filters_generate_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(header("x-goog-api-key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "models/gemini-2.5-flash",
                    "displayName": "Gemini 2.5 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/text-embedding-004",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ]
        })))
        .mount(&server)
        .await;

    let models = provider(&server).list_models().await.expect("list failed");
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name, "models/gemini-2.5-flash");
    assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.5 Flash"));
}

// =============================================================================
// Streaming
// =============================================================================

async fn mount_sse(server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{MODEL}:streamGenerateContent")))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn collect_stream(server: &MockServer) -> Vec<ChatChunk> {
    let mut rx = provider(server)
        .stream_chat(ChatRequest::prompt("Tell me about light"))
        .await
        .expect("stream failed to start");
    let mut chunks = Vec::new();
    while let Some(chunk) = rx.recv().await {
        chunks.push(chunk.expect("stream chunk error"));
    }
    chunks
}

#[tokio::test]
async fn test_stream_chat_multi_chunk_frames() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Light is\"}]}}]}\r\n",
        "\r\n",
        ": keep-alive\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" a wave\"}]}}]}\n",
        "\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" and a particle.\"}]},",
        "\"finishReason\":\"STOP\"}],\"usageMetadata\":{\"promptTokenCount\":9,\"candidatesTokenCount\":6}}\n",
        "\n",
    );
    mount_sse(&server, body).await;

    let chunks = collect_stream(&server).await;

    let text: Vec<&str> = chunks
        .iter()
        .filter(|c| !c.is_final)
        .map(|c| c.content.as_str())
        .collect();
    assert_eq!(text, vec!["Light is", " a wave", " and a particle."]);
    assert_eq!(
        chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let last = chunks.last().expect("no chunks");
    assert!(last.is_final);
    assert!(last.content.is_empty());
    assert_eq!(last.finish_reason.as_deref(), Some("STOP"));
    let usage = last.usage.as_ref().expect("usage missing");
    assert_eq!(usage.input_tokens, 9);
    assert_eq!(usage.output_tokens, 6);

    assert_eq!(chunks.iter().filter(|c| c.is_final).count(), 1);
    assert!(chunks.iter().all(|c| c.stream_id == last.stream_id));
    assert!(chunks.iter().all(|c| c.model == MODEL));
}

#[tokio::test]
async fn test_stream_without_finish_reason_still_ends() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"partial\"}]}}]}\n",
        "\n",
        "data: not json\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\" answer\"}]}}]}",
    );
    mount_sse(&server, body).await;

    let chunks = collect_stream(&server).await;

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].content, "partial");
    assert_eq!(chunks[1].content, " answer");
    assert!(chunks[2].is_final);
    assert_eq!(chunks[2].finish_reason.as_deref(), Some("stop"));
    assert!(chunks[2].usage.is_none());
}

#[tokio::test]
async fn test_stream_rate_limit_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{MODEL}:streamGenerateContent")))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .stream_chat(ChatRequest::prompt("Hello"))
        .await
        .expect_err("expected rate limit");
    assert!(matches!(err, LLMError::RateLimited { retry_after_secs: 3 }));
}

// =============================================================================
// Live API
// =============================================================================

#[tokio::test]
#[ignore = "requires GOOGLE_API_KEY and network access"]
async fn test_live_chat() {
    let key = std::env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY not set");
    let response = GoogleProvider::flash(key)
        .chat(ChatRequest::prompt("Reply with the single word: pong"))
        .await
        .expect("live chat failed");
    assert!(!response.content.is_empty());
}
