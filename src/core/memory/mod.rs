//! Learning memory.
//!
//! Conversation snippets and learning insights live in small persistent
//! vector collections and are recalled by semantic similarity to build
//! the "past learning" block of the tutor prompt.

mod embedder;
mod user_memory;
mod vector_store;

pub use embedder::{Embedder, HashingEmbedder, ProviderEmbedder, GEMINI_EMBEDDING_DIMENSION};
pub use user_memory::{
    ConversationItem, LearningInsight, LearningProfile, MemoryHit, MemoryStore, PastConversation,
    INSIGHTS_COLLECTION, MEMORY_COLLECTION,
};
pub use vector_store::{Collection, Entry, Metadata, QueryHit};

use thiserror::Error;

use crate::core::llm::LLMError;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] LLMError),

    #[error("Memory store is not available")]
    Unavailable,
}

pub type Result<T> = std::result::Result<T, MemoryError>;
