//! Single-prompt expert search.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::{self, GLOBAL};
use super::fallback::parse_numbered_personas;
use super::{strip_list_marker, Persona};
use crate::core::llm::{ChatRequest, LLMRouter};

static PERSONA_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>[A-Za-z0-9.\s']+?)[:\-—]\s*(?P<desc>.+)").expect("persona line regex")
});

/// Pull `(name, description)` pairs out of loosely formatted model output.
///
/// Accepts "1. Name: Desc", "- Name - Desc" and "Name — Desc" lines.
/// When any strictly numbered lines are present only those are kept.
pub fn parse_persona_response(text: &str) -> Vec<Persona> {
    let numbered = parse_numbered_personas(text);
    if !numbered.is_empty() {
        return numbered;
    }
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let caps = PERSONA_LINE.captures(line)?;
            let name = strip_list_marker(caps["name"].trim());
            let desc = caps["desc"].trim();
            if name.chars().count() < 2 || name.contains("Here") {
                return None;
            }
            Some(Persona::new(name, desc))
        })
        .collect()
}

/// Placeholder entries shown when no search worked
pub fn fallback_selection(topic: &str) -> Vec<Persona> {
    tracing::warn!(topic, "no experts found, using fixed fallback");
    vec![
        Persona::new("AI Agent Search Failed", "Could not connect to Gemini"),
        Persona::new("Try Again", "Please rephrase your topic"),
        Persona::new("Albert Einstein", "Default expert"),
    ]
}

pub struct SimpleSearch {
    llm: Arc<LLMRouter>,
}

impl SimpleSearch {
    pub fn new(llm: Arc<LLMRouter>) -> Self {
        Self { llm }
    }

    /// Three experts for `topic`; never empty.
    pub async fn run(&self, topic: &str, region: &str) -> Vec<Persona> {
        if region == GLOBAL {
            if let Some(experts) = catalog::demo_experts(topic) {
                tracing::info!(topic, "answered from local demo map");
                return experts
                    .iter()
                    .map(|e| Persona::new(*e, format!("Expert in {}", topic)))
                    .collect();
            }
        }

        tracing::info!(topic, region, "searching experts");
        let prompt = format!(
            r#"
Task: You are an expert finder. Identify exactly 3 real, specific people (historical or modern) who are the ABSOLUTE BEST experts to teach the topic: "{topic}".

Context:
- Topic: {topic}
- User Region: {region}

Rules:
1. CRITICAL: If User Region is NOT "Global", you MUST ONLY suggest experts from {region}.
2. If the region is "{region}", finding someone from {region} is your TOP PRIORITY.
3. If key terms like "helicopter shot" appear, find the SPECIFIC inventor/legend (e.g., MS Dhoni).
4. If the topic is broad (e.g., "Physics") and region is "Global", find the biggest names (e.g., Einstein).
5. Do NOT output generic introductions.

Output Format (Strictly 3 lines):
Name: Brief description of why they are the expert (one sentence)
Name: Brief description of why they are the expert (one sentence)
Name: Brief description of why they are the expert (one sentence)
"#
        );

        let first = match self.llm.chat(ChatRequest::prompt(prompt)).await {
            Ok(response) => parse_persona_response(&response.content),
            Err(e) => {
                tracing::warn!(topic, error = %e, "expert search failed");
                return fallback_selection(topic);
            }
        };
        if first.len() >= 3 {
            return first.into_iter().take(3).collect();
        }

        tracing::info!(topic, parsed = first.len(), "too few experts parsed, retrying with simpler prompt");
        let retry = format!("List 3 famous experts for {}. Format: Name - Description", topic);
        match self.llm.chat(ChatRequest::prompt(retry)).await {
            Ok(response) => {
                let personas = parse_persona_response(&response.content);
                if personas.is_empty() {
                    fallback_selection(topic)
                } else {
                    personas
                }
            }
            Err(e) => {
                tracing::warn!(topic, error = %e, "expert search retry failed");
                fallback_selection(topic)
            }
        }
    }
}
