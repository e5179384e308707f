//! Tutoring sessions.
//!
//! [`TutorService`] assembles the persona system prompt (base prompt,
//! encyclopedia context, persona kernel, past-conversation memory) and
//! opens or resumes a [`TutorSession`], which keeps the transcript in
//! sync with the learning history database.

mod service;
mod session;

pub use service::{StartParams, TutorService, OPENING_REQUEST};
pub use session::{TutorSession, CONNECTION_ISSUE_PREFIX, MEMORY_SNIPPET_CHARS};

use thiserror::Error;

use crate::core::llm::LLMError;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Tutor model unavailable: {0}")]
    Llm(#[from] LLMError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Learning session {0} not found")]
    SessionNotFound(i64),

    #[error("Learning session {session_id} does not belong to {user_id}")]
    NotSessionOwner { session_id: i64, user_id: String },
}

pub type Result<T> = std::result::Result<T, TutorError>;
