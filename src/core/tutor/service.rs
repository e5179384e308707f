use std::sync::Arc;

use serde_json::json;

use super::session::TutorSession;
use super::{Result, TutorError};
use crate::config::TutorConfig;
use crate::core::llm::{ChatMessage, ChatRequest, LLMRouter, MessageRole};
use crate::core::memory::MemoryStore;
use crate::core::persona::{
    persona_kernel, tutor_prompt, BionicsHarvester, StudentLevel, TutorPromptParams,
};
use crate::core::query_rewriter::QueryRewriter;
use crate::core::wiki::PersonaEnricher;
use crate::database::{AnalyticsOps, Database, NewLearningSession, SessionOps};

/// First user turn of every new session
pub const OPENING_REQUEST: &str = "Start teaching me this topic like we are having a coffee chat. Use simple analogies and end with a curiosity question.";

/// Everything needed to open a new tutoring session
#[derive(Debug, Clone)]
pub struct StartParams {
    pub user_id: String,
    pub username: String,
    pub topic: String,
    pub persona: String,
    pub region: String,
    pub level: StudentLevel,
    /// The learner named their own guide instead of picking a suggestion
    pub is_custom: bool,
}

pub struct TutorService {
    db: Database,
    llm: Arc<LLMRouter>,
    enricher: Arc<PersonaEnricher>,
    memory: Arc<MemoryStore>,
    harvester: BionicsHarvester,
    rewriter: QueryRewriter,
    config: TutorConfig,
}

impl TutorService {
    pub fn new(
        db: Database,
        llm: Arc<LLMRouter>,
        enricher: Arc<PersonaEnricher>,
        memory: Arc<MemoryStore>,
        config: TutorConfig,
    ) -> Self {
        Self {
            harvester: BionicsHarvester::new(llm.clone()),
            rewriter: QueryRewriter::new(llm.clone()),
            db,
            llm,
            enricher,
            memory,
            config,
        }
    }

    /// Open a new session: build the system prompt, get the opening
    /// lesson, then record the session, its first message and a
    /// `session_started` event.
    pub async fn start(&self, params: &StartParams) -> Result<TutorSession> {
        tracing::info!(
            user_id = %params.user_id,
            topic = %params.topic,
            persona = %params.persona,
            "starting tutoring session"
        );

        let system_prompt = self
            .system_prompt(
                &params.user_id,
                &params.username,
                &params.topic,
                &params.persona,
                params.level,
                params.is_custom,
            )
            .await;

        let opening = ChatMessage::user(OPENING_REQUEST);
        let request = ChatRequest::new(vec![opening.clone()]).with_system(system_prompt.clone());
        let reply = self.llm.chat(request).await?.content;

        let session_id = self
            .db
            .create_learning_session(&NewLearningSession {
                user_id: params.user_id.clone(),
                topic: params.topic.clone(),
                persona: params.persona.clone(),
                region: params.region.clone(),
                student_level: params.level.as_str().to_string(),
                is_custom_guide: params.is_custom,
            })
            .await?;
        self.db.add_chat_message(session_id, "assistant", &reply).await?;

        let event = json!({
            "topic": params.topic,
            "persona": params.persona,
            "region": params.region,
            "is_custom": params.is_custom,
        });
        if let Err(e) = self.db.log_analytics_event("session_started", Some(&event)).await {
            tracing::warn!(session_id, error = %e, "session_started event not logged");
        }

        Ok(TutorSession::new(
            session_id,
            params.user_id.clone(),
            params.topic.clone(),
            params.persona.clone(),
            system_prompt,
            vec![opening, ChatMessage::assistant(reply)],
            self.db.clone(),
            self.llm.clone(),
            self.memory.clone(),
            self.config.memory_every_exchanges,
        ))
    }

    /// Reopen one of `user_id`'s stored sessions with a freshly built system
    /// prompt and its saved transcript. No opening message is sent.
    pub async fn resume(
        &self,
        session_id: i64,
        user_id: &str,
        username: &str,
    ) -> Result<TutorSession> {
        let record = self
            .db
            .get_learning_session(session_id)
            .await?
            .ok_or(TutorError::SessionNotFound(session_id))?;
        if record.user_id.as_deref() != Some(user_id) {
            tracing::warn!(session_id, user_id, "refusing to resume another learner's session");
            return Err(TutorError::NotSessionOwner {
                session_id,
                user_id: user_id.to_string(),
            });
        }
        let user_id = user_id.to_string();
        let level = record
            .student_level
            .as_deref()
            .map(StudentLevel::parse_lenient)
            .unwrap_or_default();

        tracing::info!(session_id, topic = %record.topic, "resuming tutoring session");

        let system_prompt = self
            .system_prompt(
                &user_id,
                username,
                &record.topic,
                &record.persona,
                level,
                record.is_custom_guide,
            )
            .await;

        let stored = self.db.get_chat_history(session_id).await?;
        let mut history: Vec<ChatMessage> = stored
            .into_iter()
            .map(|m| match m.role.as_str() {
                "assistant" => ChatMessage::assistant(m.content),
                _ => ChatMessage::user(m.content),
            })
            .collect();
        // The stored transcript starts at the opening lesson; restore the
        // request that produced it so the model sees a user turn first.
        if history
            .first()
            .is_some_and(|m| m.role == MessageRole::Assistant)
        {
            history.insert(0, ChatMessage::user(OPENING_REQUEST));
        }

        Ok(TutorSession::new(
            session_id,
            user_id,
            record.topic,
            record.persona,
            system_prompt,
            history,
            self.db.clone(),
            self.llm.clone(),
            self.memory.clone(),
            self.config.memory_every_exchanges,
        ))
    }

    /// Base prompt, persona context, optional kernel and memory block.
    async fn system_prompt(
        &self,
        user_id: &str,
        username: &str,
        topic: &str,
        persona: &str,
        level: StudentLevel,
        is_custom: bool,
    ) -> String {
        let base = tutor_prompt(&TutorPromptParams {
            persona,
            topic,
            level,
            is_custom,
            username,
        });

        let mut prompt = self.enricher.enhance_tutor_prompt(persona, topic, &base).await;

        if self.config.use_kernel {
            let bionics = self.harvester.harvest(persona).await;
            prompt.push('\n');
            prompt.push_str(&persona_kernel(persona, Some(&bionics)));
        }

        let memory_query = if self.config.rewrite_queries {
            self.rewriter.rewrite(topic).await
        } else {
            topic.to_string()
        };
        let memory_context = self
            .memory
            .generate_context_from_memory(user_id, &memory_query)
            .await;
        if !memory_context.is_empty() {
            prompt.push_str(&memory_context);
        }

        prompt
    }
}
