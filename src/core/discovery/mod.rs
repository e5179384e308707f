//! Expert persona discovery.
//!
//! Two search strategies share one result type:
//! - `agentic`: multi-step Gemini function calling over the curated catalog
//! - `simple`: a single strict prompt with local shortcuts
//!
//! `fallback` covers offline selection when both come up short.

pub mod catalog;
mod agentic;
mod fallback;
mod simple;
mod tools;

pub use agentic::{AgentSearchResult, AgentStep, AgenticSearch, SearchStatus, MAX_AGENT_ITERATIONS};
pub use fallback::{fallback_persona_selection, find_relevant_personas, parse_numbered_personas};
pub use simple::{fallback_selection, parse_persona_response, SimpleSearch};
pub use tools::{
    agent_tools, check_region_match, search_expert_database, strip_code_fence, ExpertMatch,
    ExpertTools, ExpertiseScore, RegionMatch,
};

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A suggested guide and why they fit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// Leading list numbering and bullets, e.g. "1. " or "- " or "**"
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\-\.\*]+\s*").expect("list marker regex"));

pub(crate) fn strip_list_marker(name: &str) -> String {
    LIST_MARKER.replace(name, "").into_owned()
}
