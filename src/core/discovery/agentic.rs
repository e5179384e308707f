//! Agentic expert search.
//!
//! The model plans its own lookups: it queries the curated database,
//! reads encyclopedia bios, scores candidates and checks their region
//! before answering. Each function call is executed locally and the
//! result is returned to the model until it produces a final answer.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::simple::SimpleSearch;
use super::tools::{agent_tools, ExpertTools};
use super::{strip_list_marker, Persona};
use crate::core::llm::{ChatMessage, ChatRequest, ChatResponse, LLMError, LLMRouter};

pub const MAX_AGENT_ITERATIONS: usize = 10;
const STEP_OUTPUT_CHARS: usize = 500;

static FENCED_JSON_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(\[.*?\])\s*```").expect("fenced json regex"));

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("numbered regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Error,
}

/// One executed tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub step: usize,
    pub tool: String,
    pub input: Value,
    /// Tool output, truncated for display
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSearchResult {
    pub status: SearchStatus,
    pub topic: String,
    pub region: String,
    #[serde(default)]
    pub personas: Vec<Persona>,
    /// The model's final answer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub agent_steps: Vec<AgentStep>,
    #[serde(default)]
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentSearchResult {
    pub fn is_success(&self) -> bool {
        self.status == SearchStatus::Success
    }
}

pub struct AgenticSearch {
    llm: Arc<LLMRouter>,
    tools: ExpertTools,
    simple: SimpleSearch,
}

impl AgenticSearch {
    pub fn new(llm: Arc<LLMRouter>, tools: ExpertTools) -> Self {
        Self {
            simple: SimpleSearch::new(llm.clone()),
            llm,
            tools,
        }
    }

    pub async fn run(&self, topic: &str, region: &str) -> AgentSearchResult {
        tracing::info!(topic, region, "agentic persona search");

        match self.run_loop(topic, region).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(topic, region, error = %e, "agentic search failed");
                AgentSearchResult {
                    status: SearchStatus::Error,
                    topic: topic.to_string(),
                    region: region.to_string(),
                    personas: Vec::new(),
                    reasoning: None,
                    agent_steps: Vec::new(),
                    iterations: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn run_loop(&self, topic: &str, region: &str) -> Result<AgentSearchResult, LLMError> {
        let mut messages = vec![ChatMessage::user(agent_prompt(topic, region))];
        let mut response = self.send(&messages).await?;

        let mut steps = Vec::new();
        let mut iterations = 0;

        while iterations < MAX_AGENT_ITERATIONS {
            let calls = match response.tool_calls.take() {
                Some(calls) if !calls.is_empty() => calls,
                _ => break,
            };
            iterations += 1;
            tracing::debug!(iteration = iterations, calls = calls.len(), "agent iteration");

            messages.push(ChatMessage::assistant_tool_calls(
                response.content.clone(),
                calls.clone(),
            ));
            for call in &calls {
                let output = self.tools.process_tool_call(call).await.to_string();
                steps.push(AgentStep {
                    step: steps.len() + 1,
                    tool: call.name.clone(),
                    input: call.args.clone(),
                    output: output.chars().take(STEP_OUTPUT_CHARS).collect(),
                });
                messages.push(ChatMessage::tool_result(call.name.clone(), output));
            }

            response = self.send(&messages).await?;
        }

        let final_text = response.content;
        tracing::info!(iterations, "agent completed");

        let mut personas = parse_agent_personas(&final_text);
        if personas.is_empty() {
            tracing::info!(topic, "agent answer had no personas, falling back to simple search");
            personas = self.simple.run(topic, region).await;
        }

        Ok(AgentSearchResult {
            status: SearchStatus::Success,
            topic: topic.to_string(),
            region: region.to_string(),
            personas,
            reasoning: Some(final_text),
            agent_steps: steps,
            iterations,
            error: None,
        })
    }

    async fn send(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LLMError> {
        let request = ChatRequest::new(messages.to_vec()).with_tools(agent_tools());
        self.llm.chat(request).await
    }
}

fn agent_prompt(topic: &str, region: &str) -> String {
    format!(
        r#"
You are an expert persona discovery agent. Your task is to find the BEST expert persona for learning about "{topic}".

CRITICAL CONSTRAINTS:
1. USER SELECTED REGION: "{region}"
2. IF REGION IS NOT "Global": ONLY return personas from {region}
3. Do NOT return personas from other regions unless explicitly stated
4. Always check_region_match for final recommendations

PROCESS:
1. First, search_expert_database with topic="{topic}" and region="{region}"
2. For top 3 candidates, get_persona_wikipedia_info to verify credentials
3. validate_persona_expertise for each candidate in this topic
4. check_region_match for final filtering - MUST match selected region!
5. Return top 3 personas with highest scores from {region}

IMPORTANT: If region is "{region}", ensure ALL returned personas are from {region}.
Return personas ONLY from {region} unless it's "Global".
"#
    )
}

/// Personas from the agent's final answer.
///
/// Tries a fenced JSON array, then the whole text as JSON, then
/// numbered or bulleted `Name: Description` lines.
pub(crate) fn parse_agent_personas(text: &str) -> Vec<Persona> {
    let items: Vec<Value> = if let Some(caps) = FENCED_JSON_ARRAY.captures(text) {
        serde_json::from_str(&caps[1]).unwrap_or_default()
    } else if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        match value {
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    } else {
        return parse_listed_lines(text);
    };

    items.iter().filter_map(persona_from_json).collect()
}

fn persona_from_json(item: &Value) -> Option<Persona> {
    match item {
        Value::Object(map) => Some(Persona::new(
            map.get("name").and_then(Value::as_str).unwrap_or("Unknown"),
            map.get("description")
                .and_then(Value::as_str)
                .unwrap_or("Expert"),
        )),
        Value::Array(pair) if pair.len() >= 2 => Some(Persona::new(
            json_text(&pair[0]),
            json_text(&pair[1]),
        )),
        _ => None,
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_listed_lines(text: &str) -> Vec<Persona> {
    text.lines()
        .map(str::trim)
        .filter(|line| NUMBERED_LINE.is_match(line) || line.starts_with('-'))
        .filter_map(|line| {
            let (name, desc) = line.split_once(':')?;
            Some(Persona::new(
                strip_list_marker(name).trim(),
                desc.trim(),
            ))
        })
        .collect()
}
