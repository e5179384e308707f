//! Test modules for Curio
//!
//! Run all tests: `cargo test`
//! Run tests that call the live Gemini API: `cargo test -- --ignored`

mod common;
mod database;
mod mocks;
mod unit;
