//! Rewrites chat messages into concept-focused retrieval queries.

use std::sync::Arc;

use crate::core::llm::{ChatRequest, LLMRouter};

pub struct QueryRewriter {
    llm: Arc<LLMRouter>,
}

impl QueryRewriter {
    pub fn new(llm: Arc<LLMRouter>) -> Self {
        Self { llm }
    }

    /// Under-20-word search query for `message`; the message itself on failure.
    pub async fn rewrite(&self, message: &str) -> String {
        let prompt = format!(
            r#"
Rewrite the following user query for high-signal semantic retrieval.
Focus on decision-making, principles, strategies, and conceptual topics — not biography.

User Query: "{message}"

Constraints:
1. Expansion: Expand vague language into cognitive topics.
2. Preservation: Preserve the original core meaning.
3. Length: Keep output strictly under 20 words.
4. Output: Return ONLY the rewritten query string. No explanations.
"#
        );

        match self.llm.chat(ChatRequest::prompt(prompt)).await {
            Ok(response) => {
                let cleaned = clean_rewrite(&response.content);
                if cleaned.is_empty() {
                    message.to_string()
                } else {
                    tracing::debug!(original = message, rewritten = %cleaned, "query rewritten");
                    cleaned
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "query rewrite failed, using original");
                message.to_string()
            }
        }
    }
}

fn clean_rewrite(raw: &str) -> String {
    raw.trim().replace('"', "").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_rewrite() {
        assert_eq!(
            clean_rewrite("  \"risk assessment\nfor early founders\"  "),
            "risk assessment for early founders"
        );
        assert_eq!(clean_rewrite(" \n "), "");
    }
}
