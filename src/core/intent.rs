//! Learner intent extraction via forced function calling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::llm::{ChatRequest, LLMRouter};

pub const INTENT_FUNCTION: &str = "log_user_intent";

/// What the learner is trying to achieve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIntent {
    pub goal: String,
    pub domain: String,
    pub user_stage: String,
    pub decision_type: String,
}

impl UserIntent {
    /// Intent assumed when the model gives nothing usable
    pub fn fallback(query: &str) -> Self {
        Self {
            goal: query.to_string(),
            domain: "General".to_string(),
            user_stage: "Unknown".to_string(),
            decision_type: "Exploration".to_string(),
        }
    }
}

/// Function declaration the model is forced to call
pub fn intent_declaration() -> Value {
    json!({
        "name": INTENT_FUNCTION,
        "description": "Log the structured intent of the learner based on their query.",
        "parameters": {
            "type": "object",
            "properties": {
                "goal": {
                    "type": "string",
                    "description": "The specific objective of the user (e.g., 'start a company', 'learn sorting algorithms')."
                },
                "domain": {
                    "type": "string",
                    "description": "The broader field or industry (e.g., 'Entrepreneurship', 'Computer Science')."
                },
                "user_stage": {
                    "type": "string",
                    "description": "The inferred experience level or life stage (e.g., 'Student', 'Professional', 'Beginner')."
                },
                "decision_type": {
                    "type": "string",
                    "description": "The type of help needed (e.g., 'Career Advice', 'Technical Concept', 'Life Decision')."
                }
            },
            "required": ["goal", "domain", "user_stage", "decision_type"]
        }
    })
}

pub struct IntentParser {
    llm: Arc<LLMRouter>,
}

impl IntentParser {
    pub fn new(llm: Arc<LLMRouter>) -> Self {
        Self { llm }
    }

    pub async fn parse(&self, query: &str) -> UserIntent {
        let prompt = format!(
            r#"
Analyze this user query: "{query}"

Extract the underlying intent and call `log_user_intent`.
Infer the 'user_stage' and 'decision_type' from context if not explicit.
If vague, make a reasonable guess based on likely intent for a learning platform.
"#
        );

        let request = ChatRequest::prompt(prompt)
            .with_tools(vec![intent_declaration()])
            .with_tool_choice(json!({ "name": INTENT_FUNCTION }));

        let response = match self.llm.chat(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "intent parsing failed, using fallback");
                return UserIntent::fallback(query);
            }
        };

        let Some(call) = response
            .tool_calls
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|c| c.name == INTENT_FUNCTION)
        else {
            tracing::info!("no intent call in response, using fallback");
            return UserIntent::fallback(query);
        };

        match serde_json::from_value::<UserIntent>(call.args.clone()) {
            Ok(intent) => {
                tracing::debug!(?intent, "intent detected");
                intent
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed intent arguments, using fallback");
                UserIntent::fallback(query)
            }
        }
    }
}
