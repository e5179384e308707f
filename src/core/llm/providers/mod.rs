//! LLM Provider Implementations
//!
//! Concrete implementations of the `LLMProvider` trait.

mod google;

pub use google::{
    GoogleProvider, ModelInfo, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL,
};
