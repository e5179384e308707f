//! Unit Tests for Curio Core Components
//!
//! - LLM Providers (Gemini request formatting, errors, embeddings)
//! - Tutor sessions (prompt assembly, transcript storage, memory cadence)

mod embedder_tests;
mod providers;
mod tutor_tests;
