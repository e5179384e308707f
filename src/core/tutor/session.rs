use std::sync::Arc;

use super::Result;
use crate::core::llm::{ChatMessage, ChatRequest, LLMRouter, MessageRole};
use crate::core::memory::MemoryStore;
use crate::database::{Database, SessionOps};

pub const CONNECTION_ISSUE_PREFIX: &str = "⚠️ Let me try that again. Connection issue:";
pub const MEMORY_SNIPPET_CHARS: usize = 200;

/// A live conversation with a persona tutor.
///
/// `history` is what the learner sees, including failed turns.
/// `transcript` is what the model sees and only holds completed exchanges.
pub struct TutorSession {
    session_id: i64,
    user_id: String,
    topic: String,
    persona: String,
    system_prompt: String,
    transcript: Vec<ChatMessage>,
    history: Vec<ChatMessage>,
    db: Database,
    llm: Arc<LLMRouter>,
    memory: Arc<MemoryStore>,
    memory_every_exchanges: usize,
}

impl TutorSession {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        session_id: i64,
        user_id: String,
        topic: String,
        persona: String,
        system_prompt: String,
        transcript: Vec<ChatMessage>,
        db: Database,
        llm: Arc<LLMRouter>,
        memory: Arc<MemoryStore>,
        memory_every_exchanges: usize,
    ) -> Self {
        Self {
            session_id,
            user_id,
            topic,
            persona,
            system_prompt,
            history: transcript.clone(),
            transcript,
            db,
            llm,
            memory,
            memory_every_exchanges: memory_every_exchanges.max(1),
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Send one learner message and return the tutor's reply.
    ///
    /// Model failures come back as a connection-issue turn that is shown
    /// but never stored. Database failures are errors.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        self.history.push(ChatMessage::user(message));
        self.db.add_chat_message(self.session_id, "user", message).await?;

        let mut messages = self.transcript.clone();
        messages.push(ChatMessage::user(message));
        let request = ChatRequest::new(messages).with_system(self.system_prompt.clone());

        let reply = match self.llm.chat(request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!(session_id = self.session_id, error = %e, "tutor reply failed");
                let notice = format!("{} {}", CONNECTION_ISSUE_PREFIX, e);
                self.history.push(ChatMessage::assistant(notice.clone()));
                return Ok(notice);
            }
        };

        self.transcript.push(ChatMessage::user(message));
        self.transcript.push(ChatMessage::assistant(reply.clone()));
        self.history.push(ChatMessage::assistant(reply.clone()));
        self.db.add_chat_message(self.session_id, "assistant", &reply).await?;

        if self.completed_exchanges() % self.memory_every_exchanges == 0 {
            let snippet = format!(
                "User asked: {}\nAssistant: {}",
                message,
                reply.chars().take(MEMORY_SNIPPET_CHARS).collect::<String>()
            );
            self.memory
                .store_conversation_memory(
                    &self.user_id,
                    &self.topic,
                    &self.persona,
                    &snippet,
                    self.session_id,
                )
                .await;
        }

        Ok(reply)
    }

    /// Mark the session ended in the learning history.
    pub async fn end(&self) -> Result<()> {
        self.db.end_learning_session(self.session_id).await?;
        Ok(())
    }

    /// Learner turns answered by the model, not counting the opening request.
    fn completed_exchanges(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
            .saturating_sub(1)
    }
}
