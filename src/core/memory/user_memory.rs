//! Per-learner conversation memory and learning insights.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::embedder::Embedder;
use super::vector_store::{Collection, Entry, Metadata, QueryHit};
use super::{MemoryError, Result};

pub const MEMORY_COLLECTION: &str = "user_memory";
pub const INSIGHTS_COLLECTION: &str = "learning_insights";

const SNIPPET_PREVIEW_CHARS: usize = 150;

/// A recalled conversation snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastConversation {
    pub snippet: String,
    pub topic: String,
    pub persona: String,
    pub timestamp: String,
    pub session_id: String,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningInsight {
    pub text: String,
    #[serde(rename = "type")]
    pub insight_type: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningProfile {
    pub user_id: String,
    pub learning_insights: Vec<LearningInsight>,
    pub total_insights: usize,
    pub generated_at: String,
}

/// A topic search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryHit {
    pub content: String,
    pub topic: String,
    pub persona: String,
    pub session_id: String,
    pub timestamp: String,
}

/// Input for [`MemoryStore::batch_store_conversations`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationItem {
    pub topic: Option<String>,
    pub persona: Option<String>,
    pub snippet: Option<String>,
    pub session_id: Option<i64>,
}

struct Collections {
    memory: RwLock<Collection>,
    insights: RwLock<Collection>,
}

/// Vector memory for all learners.
///
/// A store that failed to open stays usable: writes report `false` and
/// reads come back empty.
pub struct MemoryStore {
    collections: Option<Collections>,
    embedder: Arc<dyn Embedder>,
    last_millis: AtomicI64,
}

impl MemoryStore {
    pub fn try_open(dir: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let memory = Collection::open(dir, MEMORY_COLLECTION)?;
        let insights = Collection::open(dir, INSIGHTS_COLLECTION)?;
        tracing::info!(path = %dir.display(), "memory store ready");
        Ok(Self {
            collections: Some(Collections {
                memory: RwLock::new(memory),
                insights: RwLock::new(insights),
            }),
            embedder,
            last_millis: AtomicI64::new(0),
        })
    }

    /// Open the store, degrading to an unavailable store on failure.
    pub fn open(dir: &Path, embedder: Arc<dyn Embedder>) -> Self {
        match Self::try_open(dir, embedder.clone()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "memory store unavailable");
                Self::unavailable(embedder)
            }
        }
    }

    pub fn unavailable(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            collections: None,
            embedder,
            last_millis: AtomicI64::new(0),
        }
    }

    pub fn is_available(&self) -> bool {
        self.collections.is_some()
    }

    fn collections(&self) -> Result<&Collections> {
        self.collections.as_ref().ok_or(MemoryError::Unavailable)
    }

    /// Strictly increasing unix millis, so ids stay unique within a burst.
    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_millis.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last_millis
                .compare_exchange(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    // ========================================================================
    // Conversations
    // ========================================================================

    pub async fn try_store_conversation_memory(
        &self,
        user_id: &str,
        topic: &str,
        persona: &str,
        snippet: &str,
        session_id: i64,
    ) -> Result<String> {
        let collections = self.collections()?;
        let id = format!("{}_{}_{}", user_id, session_id, self.next_millis());
        let embedding = self.embedder.embed(snippet).await?;

        let metadata = Metadata::from([
            ("user_id".to_string(), user_id.to_string()),
            ("topic".to_string(), topic.to_string()),
            ("persona".to_string(), persona.to_string()),
            ("session_id".to_string(), session_id.to_string()),
            ("timestamp".to_string(), Utc::now().to_rfc3339()),
        ]);

        collections.memory.write().await.add(Entry {
            id: id.clone(),
            document: snippet.to_string(),
            metadata,
            embedding,
        })?;
        Ok(id)
    }

    pub async fn store_conversation_memory(
        &self,
        user_id: &str,
        topic: &str,
        persona: &str,
        snippet: &str,
        session_id: i64,
    ) -> bool {
        match self
            .try_store_conversation_memory(user_id, topic, persona, snippet, session_id)
            .await
        {
            Ok(id) => {
                tracing::info!(id = %id, "conversation memory stored");
                true
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "conversation not stored in memory");
                false
            }
        }
    }

    async fn query_user_memory(
        &self,
        user_id: &str,
        text: &str,
        limit: usize,
    ) -> Result<Vec<QueryHit>> {
        let collections = self.collections()?;
        let embedding = self.embedder.embed(text).await?;
        let memory = collections.memory.read().await;
        Ok(memory.query(&embedding, &[("user_id", user_id)], limit))
    }

    pub async fn relevant_past_conversations(
        &self,
        user_id: &str,
        current_topic: &str,
        limit: usize,
    ) -> Vec<PastConversation> {
        match self.query_user_memory(user_id, current_topic, limit).await {
            Ok(hits) => {
                tracing::debug!(user_id, topic = current_topic, found = hits.len(), "past conversations retrieved");
                hits.into_iter()
                    .map(|hit| PastConversation {
                        topic: meta_or(&hit.metadata, "topic", "Unknown"),
                        persona: meta_or(&hit.metadata, "persona", "Unknown"),
                        timestamp: meta_or(&hit.metadata, "timestamp", ""),
                        session_id: meta_or(&hit.metadata, "session_id", ""),
                        snippet: hit.document,
                        distance: hit.distance,
                    })
                    .collect()
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "past conversation lookup failed");
                Vec::new()
            }
        }
    }

    /// Prompt block summarising the two closest past conversations.
    pub async fn generate_context_from_memory(&self, user_id: &str, current_topic: &str) -> String {
        let past = self.relevant_past_conversations(user_id, current_topic, 2).await;
        if past.is_empty() {
            return String::new();
        }

        let mut context = String::from("\n\n🧠 RELEVANT PAST LEARNING:\n");
        for (i, convo) in past.iter().enumerate() {
            let preview: String = convo
                .snippet
                .chars()
                .take(SNIPPET_PREVIEW_CHARS)
                .collect::<String>()
                .replace('\n', " ");
            context.push_str(&format!(
                "{}. Previously learned about '{}' with {}\n",
                i + 1,
                convo.topic,
                convo.persona
            ));
            context.push_str(&format!("   Context: {}...\n", preview));
        }
        context.push_str("\n📚 Use this context to build upon their previous knowledge!\n");
        context
    }

    pub async fn search_memory_by_topic(&self, user_id: &str, topic: &str, limit: usize) -> Vec<MemoryHit> {
        match self.query_user_memory(user_id, topic, limit).await {
            Ok(hits) => hits
                .into_iter()
                .map(|hit| MemoryHit {
                    topic: meta_or(&hit.metadata, "topic", ""),
                    persona: meta_or(&hit.metadata, "persona", ""),
                    session_id: meta_or(&hit.metadata, "session_id", ""),
                    timestamp: meta_or(&hit.metadata, "timestamp", ""),
                    content: hit.document,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "memory search failed");
                Vec::new()
            }
        }
    }

    /// Store several snippets, returning how many succeeded.
    pub async fn batch_store_conversations(&self, user_id: &str, items: &[ConversationItem]) -> usize {
        let mut stored = 0;
        for item in items {
            let ok = self
                .store_conversation_memory(
                    user_id,
                    item.topic.as_deref().unwrap_or("Unknown"),
                    item.persona.as_deref().unwrap_or("Unknown"),
                    item.snippet.as_deref().unwrap_or(""),
                    item.session_id.unwrap_or(0),
                )
                .await;
            if ok {
                stored += 1;
            }
        }
        tracing::info!(user_id, stored, total = items.len(), "batch stored conversations");
        stored
    }

    // ========================================================================
    // Insights
    // ========================================================================

    pub async fn try_store_learning_insight(
        &self,
        user_id: &str,
        insight_type: &str,
        text: &str,
        extra: Option<Metadata>,
    ) -> Result<String> {
        let collections = self.collections()?;
        let id = format!("{}_{}_{}", user_id, insight_type, self.next_millis());
        let embedding = self.embedder.embed(text).await?;

        let mut metadata = extra.unwrap_or_default();
        metadata.insert("user_id".to_string(), user_id.to_string());
        metadata.insert("insight_type".to_string(), insight_type.to_string());
        metadata.insert("timestamp".to_string(), Utc::now().to_rfc3339());

        collections.insights.write().await.add(Entry {
            id: id.clone(),
            document: text.to_string(),
            metadata,
            embedding,
        })?;
        Ok(id)
    }

    pub async fn store_learning_insight(
        &self,
        user_id: &str,
        insight_type: &str,
        text: &str,
        extra: Option<Metadata>,
    ) -> bool {
        match self
            .try_store_learning_insight(user_id, insight_type, text, extra)
            .await
        {
            Ok(id) => {
                tracing::info!(id = %id, "learning insight stored");
                true
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "learning insight not stored");
                false
            }
        }
    }

    pub async fn user_learning_insights(&self, user_id: &str, limit: usize) -> Vec<LearningInsight> {
        let Ok(collections) = self.collections() else {
            return Vec::new();
        };
        collections
            .insights
            .read()
            .await
            .get(&[("user_id", user_id)], Some(limit))
            .into_iter()
            .map(|entry| LearningInsight {
                insight_type: meta_or(&entry.metadata, "insight_type", ""),
                timestamp: meta_or(&entry.metadata, "timestamp", ""),
                text: entry.document,
            })
            .collect()
    }

    pub async fn user_learning_profile(&self, user_id: &str) -> LearningProfile {
        let insights = self.user_learning_insights(user_id, 10).await;
        LearningProfile {
            user_id: user_id.to_string(),
            total_insights: insights.len(),
            learning_insights: insights,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    // ========================================================================
    // Privacy
    // ========================================================================

    /// Forget everything stored for `user_id`.
    ///
    /// An unavailable store has nothing to forget and still reports `true`;
    /// only a failed delete reports `false`.
    pub async fn clear_user_memory(&self, user_id: &str) -> bool {
        let Ok(collections) = self.collections() else {
            tracing::info!(user_id, "memory store unavailable, nothing to clear");
            return true;
        };

        let mut cleared = 0;
        for collection in [&collections.memory, &collections.insights] {
            let mut guard = collection.write().await;
            let ids: Vec<String> = guard
                .get(&[("user_id", user_id)], None)
                .into_iter()
                .map(|e| e.id)
                .collect();
            match guard.delete(&ids) {
                Ok(n) => cleared += n,
                Err(e) => {
                    tracing::warn!(user_id, collection = guard.name(), error = %e, "clearing memory failed");
                    return false;
                }
            }
        }

        if cleared == 0 {
            tracing::info!(user_id, "no memory to clear");
        } else {
            tracing::info!(user_id, cleared, "user memory cleared");
        }
        true
    }
}

fn meta_or(metadata: &Metadata, key: &str, default: &str) -> String {
    metadata
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}
