//! LLM Provider Unit Tests
//!
//! Uses wiremock for HTTP mocking to test:
//! - API request formatting
//! - Response parsing (success and error cases)
//! - Function calling
//! - Rate limit and invalid API key handling
//! - Embeddings and model listing

mod google_tests;
