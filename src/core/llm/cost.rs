//! Gemini Cost Tracking
//!
//! Token usage accounting and per-model pricing for the Gemini family.

use serde::{Deserialize, Serialize};

// ============================================================================
// Token Usage
// ============================================================================

/// Token usage for a request/response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input/prompt tokens
    pub input_tokens: u32,
    /// Number of output/completion tokens
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

// ============================================================================
// Provider Pricing
// ============================================================================

/// Pricing information for a provider/model combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPricing {
    /// Provider family (e.g., "google")
    pub provider_id: String,
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model_id: String,
    /// Cost per 1 million input tokens in USD
    pub input_cost_per_million: f64,
    /// Cost per 1 million output tokens in USD
    pub output_cost_per_million: f64,
    pub context_window: Option<u32>,
    pub max_output_tokens: Option<u32>,
    pub is_free: bool,
}

impl ProviderPricing {
    /// Calculate cost for given token usage
    pub fn calculate_cost(&self, usage: &TokenUsage) -> f64 {
        if self.is_free {
            return 0.0;
        }
        let input_cost = (usage.input_tokens as f64 / 1_000_000.0) * self.input_cost_per_million;
        let output_cost =
            (usage.output_tokens as f64 / 1_000_000.0) * self.output_cost_per_million;
        input_cost + output_cost
    }

    /// Estimate cost for a request (before execution)
    pub fn estimate_cost(&self, estimated_input: u32, estimated_output: u32) -> f64 {
        self.calculate_cost(&TokenUsage::new(estimated_input, estimated_output))
    }

    /// Known pricing for Gemini models.
    ///
    /// Order matters: more specific model names are matched first.
    pub fn for_model(provider: &str, model: &str) -> Option<Self> {
        let (input, output, context, max_out) = match (provider, model) {
            ("gemini", m) | ("google", m) if m.contains("2.5-flash-lite") => {
                (0.10, 0.40, Some(1_048_576), Some(65_536))
            }
            ("gemini", m) | ("google", m) if m.contains("2.5-flash") => {
                (0.30, 2.50, Some(1_048_576), Some(65_536))
            }
            ("gemini", m) | ("google", m) if m.contains("2.5-pro") => {
                (1.25, 10.0, Some(1_048_576), Some(65_536))
            }
            ("gemini", m) | ("google", m) if m.contains("2.0-flash-lite") => {
                (0.075, 0.30, Some(1_048_576), Some(8_192))
            }
            ("gemini", m) | ("google", m) if m.contains("2.0-flash") => {
                (0.10, 0.40, Some(1_000_000), Some(8_192))
            }
            ("gemini", m) | ("google", m) if m.contains("1.5-pro") => {
                (1.25, 5.0, Some(2_000_000), Some(8_192))
            }
            ("gemini", m) | ("google", m) if m.contains("1.5-flash") => {
                (0.075, 0.30, Some(1_000_000), Some(8_192))
            }
            ("gemini", m) | ("google", m) if m.contains("embedding") => {
                return Some(Self {
                    provider_id: provider.to_string(),
                    model_id: model.to_string(),
                    input_cost_per_million: 0.0,
                    output_cost_per_million: 0.0,
                    context_window: Some(2_048),
                    max_output_tokens: None,
                    is_free: true,
                });
            }
            _ => return None,
        };

        Some(Self {
            provider_id: provider.to_string(),
            model_id: model.to_string(),
            input_cost_per_million: input,
            output_cost_per_million: output,
            context_window: context,
            max_output_tokens: max_out,
            is_free: false,
        })
    }
}
