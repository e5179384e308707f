//! Provider-backed embedder tests

use std::sync::Arc;

use tempfile::TempDir;

use crate::core::llm::LLMError;
use crate::core::memory::{Embedder, MemoryError, MemoryStore, ProviderEmbedder};
use crate::tests::mocks::ScriptedProvider;

#[tokio::test]
async fn test_provider_embedder_returns_provider_vector() {
    let provider = ScriptedProvider::constant("unused").with_embedding(vec![0.6, 0.8, 0.0]);
    let embedded = provider.embedded();
    let embedder = ProviderEmbedder::new(Arc::new(provider)).with_dimension(3);

    let vector = embedder.embed("wave-particle duality").await.expect("embed failed");

    assert_eq!(vector, vec![0.6, 0.8, 0.0]);
    assert_eq!(embedder.dimension(), 3);
    assert_eq!(
        embedded.lock().expect("embedded lock").as_slice(),
        ["wave-particle duality".to_string()]
    );
}

#[tokio::test]
async fn test_provider_embedder_rejects_empty_vector() {
    let provider = ScriptedProvider::constant("unused").with_embedding(Vec::new());
    let embedder = ProviderEmbedder::new(Arc::new(provider));

    let result = embedder.embed("anything").await;
    assert!(matches!(
        result,
        Err(MemoryError::Embedding(LLMError::EmbeddingError(_)))
    ));
}

#[tokio::test]
async fn test_provider_without_embeddings_is_an_error() {
    let embedder = ProviderEmbedder::new(Arc::new(ScriptedProvider::constant("unused")));

    let result = embedder.embed("anything").await;
    assert!(matches!(
        result,
        Err(MemoryError::Embedding(LLMError::EmbeddingNotSupported(_)))
    ));
}

#[tokio::test]
async fn test_memory_store_round_trip_with_provider_embedder() {
    let dir = TempDir::new().expect("Failed to create memory dir");
    let provider = ScriptedProvider::constant("unused").with_embedding(vec![1.0, 0.0, 0.0, 0.0]);
    let embedder = Arc::new(ProviderEmbedder::new(Arc::new(provider)).with_dimension(4));
    let memory = MemoryStore::open(dir.path(), embedder);

    assert!(
        memory
            .store_conversation_memory(
                "learner",
                "Optics",
                "Isaac Newton",
                "User asked: why is the sky blue?",
                3,
            )
            .await
    );

    let hits = memory.search_memory_by_topic("learner", "light scattering", 5).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].persona, "Isaac Newton");
}
