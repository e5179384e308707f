//! Wikipedia biography scraper.
//!
//! Pulls the lead paragraphs and the infobox of a person's article. Only
//! `<p>`, `table.infobox`, its `<tr>/<th>/<td>` cells and the first `<img>`
//! are needed.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::enrich::avatar_fallback_url;
use super::WikiError;
use crate::config::WikiConfig;

const MAX_PARAGRAPHS: usize = 5;
const MIN_PARAGRAPH_CHARS: usize = 50;
const BIO_TARGET_CHARS: usize = 500;
const BIO_MAX_CHARS: usize = 600;
const FACT_MAX_CHARS: usize = 100;

/// Infobox rows worth keeping.
pub const KEY_FACT_LABELS: [&str; 5] = ["Born", "Died", "Occupation", "Known for", "Education"];

/// Biography extracted from an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiSummary {
    pub name: String,
    pub bio: String,
    /// Infobox facts in page order
    pub key_facts: Vec<(String, String)>,
    pub image_url: Option<String>,
    pub source: String,
}

impl WikiSummary {
    pub fn fact(&self, label: &str) -> Option<&str> {
        self.key_facts
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }

    /// Facts as a JSON object, for tool output
    pub fn key_facts_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .key_facts
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

pub struct WikipediaClient {
    client: Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(config: &WikiConfig) -> Result<Self, WikiError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn article_url(&self, persona: &str) -> String {
        let title = persona.trim().replace(' ', "_");
        format!("{}/wiki/{}", self.base_url, urlencoding::encode(&title))
    }

    /// Fetch and parse the article. A non-200 status is `Ok(None)`.
    pub async fn fetch_summary(&self, persona: &str) -> Result<Option<WikiSummary>, WikiError> {
        let url = self.article_url(persona);
        let resp = self.client.get(&url).send().await?;

        if resp.status() != StatusCode::OK {
            tracing::debug!(persona, status = resp.status().as_u16(), "no wikipedia article");
            return Ok(None);
        }

        let html = resp.text().await?;
        Ok(Some(parse_article(persona, &html)))
    }

    /// Like [`fetch_summary`](Self::fetch_summary), logging and swallowing transport errors.
    pub async fn scrape_summary(&self, persona: &str) -> Option<WikiSummary> {
        match self.fetch_summary(persona).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(persona, error = %e, "wikipedia scraping failed");
                None
            }
        }
    }

    /// Infobox portrait of `persona`, or a generated avatar.
    pub async fn image_url(&self, persona: &str) -> String {
        self.scrape_summary(persona)
            .await
            .and_then(|s| s.image_url)
            .unwrap_or_else(|| avatar_fallback_url(persona))
    }
}

// ============================================================================
// HTML extraction
// ============================================================================

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("p selector"));
static INFOBOX: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.infobox").expect("infobox selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("img selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static TH: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("th selector"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector"));

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").expect("citation regex"));

/// Concatenated text nodes, entities decoded
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Lead-paragraph biography
fn extract_bio(document: &Html) -> String {
    let mut bio = String::new();
    for paragraph in document.select(&PARAGRAPH).take(MAX_PARAGRAPHS) {
        let text = element_text(paragraph);
        let text = text.trim();
        if text.chars().count() > MIN_PARAGRAPH_CHARS {
            bio.push_str(text);
            bio.push(' ');
            if bio.chars().count() > BIO_TARGET_CHARS {
                break;
            }
        }
    }

    let cleaned = CITATION.replace_all(&bio, "");
    truncate_chars(&cleaned, BIO_MAX_CHARS).trim().to_string()
}

fn extract_image(infobox: ElementRef<'_>) -> Option<String> {
    let src = infobox.select(&IMG).next()?.value().attr("src")?;
    if src.is_empty() {
        return None;
    }
    Some(match src.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => src.to_string(),
    })
}

/// Labelled rows anywhere in the infobox. A row's value is the text of its
/// first cell, nested tables included.
fn extract_key_facts(infobox: ElementRef<'_>) -> Vec<(String, String)> {
    let mut facts: Vec<(String, String)> = Vec::new();
    for row in infobox.select(&ROW) {
        let (Some(th), Some(td)) = (row.select(&TH).next(), row.select(&TD).next()) else {
            continue;
        };
        let key = element_text(th).trim().to_string();
        if !KEY_FACT_LABELS.contains(&key.as_str()) {
            continue;
        }
        let value = truncate_chars(element_text(td).trim(), FACT_MAX_CHARS);
        match facts.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => facts.push((key, value)),
        }
    }
    facts
}

/// Parse a full article page
pub fn parse_article(persona: &str, html: &str) -> WikiSummary {
    let document = Html::parse_document(html);
    let bio = extract_bio(&document);
    let (image_url, key_facts) = match document.select(&INFOBOX).next() {
        Some(infobox) => (extract_image(infobox), extract_key_facts(infobox)),
        None => (None, Vec::new()),
    };

    WikiSummary {
        name: persona.to_string(),
        bio,
        key_facts,
        image_url,
        source: "Wikipedia".to_string(),
    }
}
