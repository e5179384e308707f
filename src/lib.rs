/// Curio - learn any topic from a persona tutor
///
/// Core library providing expert persona discovery, encyclopedia
/// grounding, Gemini-backed tutoring sessions, semantic learning memory
/// and a SQLite learning history.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod database;
pub mod error;

#[cfg(test)]
mod tests;

pub use error::{CurioError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
