//! Persona enrichment built on the scraper and the LLM router.

use std::sync::Arc;

use super::scraper::WikipediaClient;
use crate::core::llm::{ChatRequest, LLMRouter};

const BIO_EXCERPT_CHARS: usize = 300;

/// Avatar used when no encyclopedia image exists
pub fn avatar_fallback_url(persona: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random&size=200&bold=true",
        persona.replace(' ', "+")
    )
}

pub struct PersonaEnricher {
    wiki: Arc<WikipediaClient>,
    llm: Arc<LLMRouter>,
}

impl PersonaEnricher {
    pub fn new(wiki: Arc<WikipediaClient>, llm: Arc<LLMRouter>) -> Self {
        Self { wiki, llm }
    }

    pub fn wiki(&self) -> &WikipediaClient {
        &self.wiki
    }

    /// Short teaching profile of `persona`, grounded on the bio when one exists.
    pub async fn persona_context(&self, persona: &str, topic: &str) -> String {
        let wiki_line = match self.wiki.scrape_summary(persona).await {
            Some(summary) => format!(
                "Wikipedia data: {}",
                summary.bio.chars().take(BIO_EXCERPT_CHARS).collect::<String>()
            ),
            None => String::new(),
        };

        let prompt = format!(
            r#"
Create a brief, accurate profile for {persona} to help them teach about {topic}.

Include:
1. Their main expertise and achievements (2-3 sentences)
2. Their teaching/communication style
3. 1-2 famous quotes or sayings (if applicable)

{wiki_line}

Keep it concise (max 150 words) and factual.
"#
        );

        match self.llm.chat(ChatRequest::prompt(prompt)).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                tracing::warn!(persona, error = %e, "persona context unavailable, using generic line");
                format!("{} is a renowned expert in their field.", persona)
            }
        }
    }

    /// Wrap `base_prompt` with the persona context block.
    pub async fn enhance_tutor_prompt(&self, persona: &str, topic: &str, base_prompt: &str) -> String {
        let context = self.persona_context(persona, topic).await;
        format!(
            "\n{base_prompt}\n\nPERSONA CONTEXT (Use this to inform your teaching style):\n{context}\n\nRemember to embody {persona}'s authentic expertise and communication style!\n"
        )
    }

    /// One "Did you know?" sentence, or `None` without a bio or model.
    pub async fn fun_fact(&self, persona: &str) -> Option<String> {
        let summary = self.wiki.scrape_summary(persona).await?;

        let prompt = format!(
            r#"
From this Wikipedia bio about {persona}, extract ONE interesting, lesser-known fun fact.

Bio: {bio}

Return ONLY the fun fact in one sentence, starting with "Did you know?"
"#,
            bio = summary.bio
        );

        match self.llm.chat(ChatRequest::prompt(prompt)).await {
            Ok(response) => Some(response.content.trim().to_string()),
            Err(e) => {
                tracing::warn!(persona, error = %e, "fun fact generation failed");
                None
            }
        }
    }

    pub async fn image_url(&self, persona: &str) -> String {
        self.wiki.image_url(persona).await
    }
}
