//! Offline persona selection.

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog;
use super::simple::SimpleSearch;
use super::Persona;

const PICKS: usize = 3;

static NUMBERED_PERSONA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s*(.*?):\s*(.*)").expect("numbered persona regex"));

/// Three guides for `topic`: model search first, catalog selection otherwise.
pub async fn find_relevant_personas(search: &SimpleSearch, topic: &str, region: &str) -> Vec<Persona> {
    let personas = search.run(topic, region).await;
    if personas.len() >= PICKS {
        return personas.into_iter().take(PICKS).collect();
    }
    fallback_persona_selection(topic, region)
}

/// Catalog-only selection.
///
/// Topic experts come first, then one person from `region`, then famous
/// names until three distinct picks exist.
pub fn fallback_persona_selection(topic: &str, region: &str) -> Vec<Persona> {
    let lowered = topic.to_lowercase();

    let topic_experts: &[&str] = catalog::TOPIC_EXPERT_MAP
        .iter()
        .find(|(key, _)| lowered.contains(*key))
        .map(|(_, experts)| *experts)
        .or_else(|| {
            catalog::KEYWORD_EXPERT_MAP
                .iter()
                .find(|(keywords, _)| keywords.iter().any(|kw| lowered.contains(*kw)))
                .map(|(_, experts)| *experts)
        })
        .unwrap_or(&[]);

    let mut picks: Vec<Persona> = Vec::with_capacity(PICKS);
    let is_used = |picks: &[Persona], name: &str| picks.iter().any(|p| p.name == name);

    for expert in topic_experts {
        if picks.len() < PICKS && !is_used(&picks, expert) {
            picks.push(Persona::new(*expert, "Topic-specific authority"));
        }
    }

    if picks.len() < PICKS {
        if let Some(local) = catalog::country_personas(region)
            .iter()
            .find(|name| !is_used(&picks, name))
        {
            picks.push(Persona::new(*local, format!("Renowned {} expert", region)));
        }
    }

    for famous in catalog::FAMOUS_PERSONAS {
        if picks.len() >= PICKS {
            break;
        }
        if !is_used(&picks, famous) {
            picks.push(Persona::new(*famous, "Renowned thinker"));
        }
    }

    picks
}

/// Only strict "N. Name: Description" lines
pub fn parse_numbered_personas(text: &str) -> Vec<Persona> {
    NUMBERED_PERSONA
        .captures_iter(text)
        .map(|caps| Persona::new(caps[1].trim(), caps[2].trim()))
        .collect()
}
