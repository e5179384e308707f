//! Wikipedia grounding for personas.
//!
//! `scraper` pulls a short biography and infobox facts; `enrich` turns
//! that into tutor prompt context, fun facts and avatar images.

mod enrich;
mod scraper;

pub use enrich::{avatar_fallback_url, PersonaEnricher};
pub use scraper::{parse_article, WikiSummary, WikipediaClient, KEY_FACT_LABELS};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WikiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
