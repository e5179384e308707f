//! Top-level error type reported by the `curio` binary.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::core::llm::LLMError;
use crate::core::memory::MemoryError;
use crate::core::tutor::TutorError;
use crate::core::wiki::WikiError;
use crate::database::DatabaseError;

#[derive(Debug, Error, Diagnostic)]
pub enum CurioError {
    #[error(transparent)]
    #[diagnostic(
        code("CURIO::CONFIG"),
        help("Set GOOGLE_API_KEY or edit ~/.config/curio/config.toml")
    )]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    #[diagnostic(code("CURIO::LLM"), help("Try again, or list usable models with `curio models`"))]
    Llm(#[from] LLMError),

    #[error("Encyclopedia lookup failed: {0}")]
    #[diagnostic(code("CURIO::WIKI"))]
    Wiki(#[from] WikiError),

    #[error("Memory error: {0}")]
    #[diagnostic(code("CURIO::MEMORY"))]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(code("CURIO::DATABASE"), help("Check that the data directory is writable"))]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    #[diagnostic(code("CURIO::TUTOR"))]
    Tutor(#[from] TutorError),

    #[error("{0}")]
    #[diagnostic(code("CURIO::NOT_FOUND"))]
    NotFound(String),

    #[error("Terminal I/O failed: {0}")]
    #[diagnostic(code("CURIO::IO"))]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CurioError>;
