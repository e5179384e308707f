//! Function-calling tools for the discovery agent.
//!
//! Each tool returns JSON that is fed back to the model verbatim.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{self, GLOBAL};
use crate::core::llm::{ChatRequest, LLMRouter, ToolCall};
use crate::core::wiki::WikipediaClient;

const MAX_MATCHES: usize = 10;
const VALIDATION_BIO_CHARS: usize = 500;

/// One candidate from the curated database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertMatch {
    pub name: String,
    pub relevance: String,
    pub source: String,
    pub region: String,
    pub category: String,
    pub match_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Curated experts for `topic`, restricted to `region` unless it is Global.
pub fn search_expert_database(topic: &str, region: &str) -> Vec<ExpertMatch> {
    let category = catalog::category_for_topic(topic);
    tracing::debug!(topic, region, category, "searching expert database");

    let mut results = Vec::new();
    if region == GLOBAL {
        for (name, _) in catalog::REGION_PERSONAS.iter().filter(|(name, _)| *name != GLOBAL) {
            for expert in catalog::region_experts(name, category) {
                results.push(ExpertMatch {
                    name: expert.to_string(),
                    relevance: "high".to_string(),
                    source: "regional_database".to_string(),
                    region: name.to_string(),
                    category: category.to_string(),
                    match_type: "category_match".to_string(),
                    priority: None,
                    note: None,
                });
            }
        }
    } else {
        for expert in catalog::region_experts(region, category) {
            results.push(ExpertMatch {
                name: expert.to_string(),
                relevance: "high".to_string(),
                source: "regional_database".to_string(),
                region: region.to_string(),
                category: category.to_string(),
                match_type: "exact_regional_match".to_string(),
                priority: Some(1),
                note: None,
            });
        }

        if results.is_empty() {
            tracing::info!(region, category, "no regional experts, falling back to global");
            for expert in catalog::region_experts(GLOBAL, category) {
                results.push(ExpertMatch {
                    name: expert.to_string(),
                    relevance: "medium".to_string(),
                    source: "global_fallback".to_string(),
                    region: GLOBAL.to_string(),
                    category: category.to_string(),
                    match_type: "global_fallback".to_string(),
                    priority: Some(2),
                    note: Some(format!("No experts in {}, using global expert", region)),
                });
            }
        }
    }

    results.truncate(MAX_MATCHES);
    results
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMatch {
    pub persona: String,
    pub region: String,
    pub is_from_region: bool,
    pub regional_bonus: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Absent for Global, `null` when no category matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_in_category: Option<Option<String>>,
}

pub fn check_region_match(persona: &str, region: &str) -> RegionMatch {
    if region == GLOBAL {
        return RegionMatch {
            persona: persona.to_string(),
            region: region.to_string(),
            is_from_region: true,
            regional_bonus: 0,
            note: Some("Global region accepts all personas".to_string()),
            found_in_category: None,
        };
    }

    let category = catalog::region_categories(region)
        .iter()
        .find(|(_, experts)| experts.contains(&persona))
        .map(|(category, _)| category.to_string());
    let is_match = category.is_some();

    RegionMatch {
        persona: persona.to_string(),
        region: region.to_string(),
        is_from_region: is_match,
        regional_bonus: if is_match { 20 } else { 0 },
        note: None,
        found_in_category: Some(category),
    }
}

/// Model verdict on a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertiseScore {
    pub score: u32,
    pub reasoning: String,
    pub is_expert: bool,
}

impl ExpertiseScore {
    pub fn unavailable() -> Self {
        Self {
            score: 60,
            reasoning: "Validation unavailable".to_string(),
            is_expert: true,
        }
    }
}

/// Strip a ```json (or bare ```) fence around a model answer
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = text.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        text
    };
    inner.trim()
}

/// Function declarations offered to the agent
pub fn agent_tools() -> Vec<Value> {
    vec![
        json!({
            "name": "search_expert_database",
            "description": "Search curated database of experts by topic AND REGION. Critical: Must respect regional filtering!",
            "parameters": {
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The topic to search experts for (e.g., 'Python', 'Physics', 'Business')"
                    },
                    "region": {
                        "type": "string",
                        "description": "The region to search in (e.g., 'India', 'United States', 'Germany', 'Global'). CRITICAL: You MUST use the exact region name provided by the user. Do NOT default to Global unless user specified Global."
                    }
                },
                "required": ["topic", "region"]
            }
        }),
        json!({
            "name": "get_persona_wikipedia_info",
            "description": "Fetch detailed Wikipedia information about a specific persona including bio and expertise.",
            "parameters": {
                "type": "object",
                "properties": {
                    "persona_name": {
                        "type": "string",
                        "description": "Full name of the persona to look up"
                    }
                },
                "required": ["persona_name"]
            }
        }),
        json!({
            "name": "validate_persona_expertise",
            "description": "Validate and score a persona's expertise in a specific topic (0-100 scale).",
            "parameters": {
                "type": "object",
                "properties": {
                    "persona_name": {
                        "type": "string",
                        "description": "Name of the persona to validate"
                    },
                    "topic": {
                        "type": "string",
                        "description": "Topic to validate expertise in"
                    },
                    "bio": {
                        "type": "string",
                        "description": "Optional biography text to help with validation"
                    },
                    "region": {
                        "type": "string",
                        "description": "Region context for validation"
                    }
                },
                "required": ["persona_name", "topic"]
            }
        }),
        json!({
            "name": "check_region_match",
            "description": "CRITICAL: Verify if a persona is from the specified region. Use this to filter results!",
            "parameters": {
                "type": "object",
                "properties": {
                    "persona_name": {
                        "type": "string",
                        "description": "Name of the persona"
                    },
                    "region": {
                        "type": "string",
                        "description": "Region to check (must match user's selected region exactly)"
                    }
                },
                "required": ["persona_name", "region"]
            }
        }),
    ]
}

/// Tools that need network access
pub struct ExpertTools {
    wiki: Arc<WikipediaClient>,
    llm: Arc<LLMRouter>,
}

impl ExpertTools {
    pub fn new(wiki: Arc<WikipediaClient>, llm: Arc<LLMRouter>) -> Self {
        Self { wiki, llm }
    }

    pub async fn persona_wikipedia_info(&self, persona: &str) -> Value {
        match self.wiki.fetch_summary(persona).await {
            Ok(Some(summary)) => json!({
                "name": persona,
                "bio": summary.bio,
                "key_facts": summary.key_facts_json(),
                "source": "wikipedia",
                "found": true,
            }),
            Ok(None) => json!({
                "name": persona,
                "found": false,
                "error": "Wikipedia page not found or inaccessible",
            }),
            Err(e) => {
                tracing::warn!(persona, error = %e, "wikipedia lookup failed");
                json!({
                    "name": persona,
                    "found": false,
                    "error": e.to_string(),
                })
            }
        }
    }

    pub async fn validate_persona_expertise(
        &self,
        persona: &str,
        topic: &str,
        bio: &str,
        region: &str,
    ) -> ExpertiseScore {
        let region_context = if region != GLOBAL {
            format!("\nRegion preference: {}", region)
        } else {
            String::new()
        };
        let bio_excerpt = if bio.is_empty() {
            "No bio provided".to_string()
        } else {
            bio.chars().take(VALIDATION_BIO_CHARS).collect()
        };

        let prompt = format!(
            r#"
Analyze if {persona} is a genuine expert in "{topic}".{region_context}

Bio: {bio_excerpt}

Rate their expertise from 0-100 where:
- 90-100: World-renowned expert, pioneered the field
- 70-89: Significant contributor, well-known in field
- 50-69: Knowledgeable, some contributions
- 30-49: Tangentially related
- 0-29: Not relevant

Return ONLY a JSON object with no markdown:
{{
    "score": <number>,
    "reasoning": "<brief explanation>",
    "is_expert": <true/false>
}}
"#
        );

        let response = match self.llm.chat(ChatRequest::prompt(prompt)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(persona, error = %e, "expertise validation failed");
                return ExpertiseScore::unavailable();
            }
        };

        match serde_json::from_str::<ExpertiseScore>(strip_code_fence(&response.content)) {
            Ok(score) => {
                tracing::debug!(persona, score = score.score, "expertise validated");
                score
            }
            Err(e) => {
                tracing::warn!(persona, error = %e, "unparseable expertise verdict");
                ExpertiseScore::unavailable()
            }
        }
    }

    /// Run the tool the model asked for.
    pub async fn process_tool_call(&self, call: &ToolCall) -> Value {
        tracing::info!(tool = %call.name, args = %call.args, "tool call");

        match call.name.as_str() {
            "search_expert_database" => to_json(&search_expert_database(
                call.arg_str("topic", ""),
                call.arg_str("region", GLOBAL),
            )),
            "get_persona_wikipedia_info" => {
                self.persona_wikipedia_info(call.arg_str("persona_name", ""))
                    .await
            }
            "validate_persona_expertise" => to_json(
                &self
                    .validate_persona_expertise(
                        call.arg_str("persona_name", ""),
                        call.arg_str("topic", ""),
                        call.arg_str("bio", ""),
                        call.arg_str("region", GLOBAL),
                    )
                    .await,
            ),
            "check_region_match" => to_json(&check_region_match(
                call.arg_str("persona_name", ""),
                call.arg_str("region", GLOBAL),
            )),
            other => json!({ "error": format!("Unknown tool: {}", other) }),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "error": e.to_string() }))
}
