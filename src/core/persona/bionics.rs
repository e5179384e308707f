//! Bionics: voice samples for the persona kernel.
//!
//! Asks the model to recall verifiable quotes and speech patterns so the
//! kernel can imitate sentence structure and catchphrases.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::kernel::DEFAULT_VOICE;
use crate::core::llm::{ChatRequest, LLMRouter};

/// Harvested voice material for one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bionics {
    pub voice_samples: String,
    /// Recent real-world context. Not harvested yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_context: Option<String>,
}

impl Default for Bionics {
    fn default() -> Self {
        Self {
            voice_samples: DEFAULT_VOICE.to_string(),
            real_context: None,
        }
    }
}

pub struct BionicsHarvester {
    llm: Arc<LLMRouter>,
}

impl BionicsHarvester {
    pub fn new(llm: Arc<LLMRouter>) -> Self {
        Self { llm }
    }

    /// Recall five distinct quotes or speech patterns of `persona`.
    ///
    /// Model failures degrade to [`Bionics::default`].
    pub async fn harvest(&self, persona: &str) -> Bionics {
        tracing::debug!(persona, "harvesting voice samples");

        let prompt = format!(
            r#"
Recall 5 distinct, verifiable quotes or speech patterns of {persona}.
Focus on their unique sentence structure, catchphrases, or ticks.

FORMAT:
- "Quote 1"
- "Quote 2"
- Pattern: [Description of speech style]
"#
        );

        match self.llm.chat(ChatRequest::prompt(prompt)).await {
            Ok(response) if !response.content.trim().is_empty() => {
                tracing::info!(persona, "voice samples acquired");
                Bionics {
                    voice_samples: response.content.trim().to_string(),
                    real_context: None,
                }
            }
            Ok(_) => Bionics::default(),
            Err(e) => {
                tracing::warn!(persona, error = %e, "voice harvesting failed, using default voice");
                Bionics::default()
            }
        }
    }
}
