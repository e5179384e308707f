//! Persistent vector collections.
//!
//! Each collection is a flat list of entries kept in memory and written to
//! `{dir}/{name}.json` after every mutation. Search is a linear cosine scan,
//! which is plenty for one learner's history.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Result;

pub type Metadata = HashMap<String, String>;

/// A stored document with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub document: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

impl Entry {
    /// Equality match on every `(key, value)` pair of `filter`
    pub fn matches(&self, filter: &[(&str, &str)]) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.metadata.get(*key).map(String::as_str) == Some(*value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryHit {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    /// Cosine distance, `1 - similarity`
    pub distance: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    name: String,
    entries: Vec<Entry>,
}

pub struct Collection {
    name: String,
    path: PathBuf,
    entries: Vec<Entry>,
}

impl Collection {
    /// Open `name` under `dir`, creating both when missing.
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", name));

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let file: CollectionFile = serde_json::from_str(&raw)?;
            file.entries
        } else {
            Vec::new()
        };

        tracing::debug!(collection = name, entries = entries.len(), "collection opened");
        Ok(Self {
            name: name.to_string(),
            path,
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Insert an entry; an existing id is replaced.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.persist()
    }

    /// Nearest `n` entries matching `filter`, closest first.
    ///
    /// Entries whose embedding size differs from the query are skipped.
    pub fn query(&self, embedding: &[f32], filter: &[(&str, &str)], n: usize) -> Vec<QueryHit> {
        let mut hits: Vec<QueryHit> = self
            .entries
            .iter()
            .filter(|e| e.embedding.len() == embedding.len() && e.matches(filter))
            .map(|e| QueryHit {
                id: e.id.clone(),
                document: e.document.clone(),
                metadata: e.metadata.clone(),
                distance: 1.0 - cosine_similarity(embedding, &e.embedding),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(n);
        hits
    }

    /// Entries matching `filter` in insertion order
    pub fn get(&self, filter: &[(&str, &str)], limit: Option<usize>) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.matches(filter))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Remove entries by id, returning how many were removed.
    pub fn delete(&mut self, ids: &[String]) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|e| !ids.contains(&e.id));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        let file = CollectionFile {
            name: self.name.clone(),
            entries: self.entries.clone(),
        };
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&file)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
