//! Learning session and transcript operations

use std::future::Future;

use super::models::{
    ChatMessageRecord, LearningSessionRecord, NewLearningSession, SessionDetails,
};
use super::{Database, Result};

/// Extension trait for session and chat message operations
pub trait SessionOps {
    fn create_learning_session(
        &self,
        session: &NewLearningSession,
    ) -> impl Future<Output = Result<i64>> + Send;
    fn get_learning_session(
        &self,
        session_id: i64,
    ) -> impl Future<Output = Result<Option<LearningSessionRecord>>> + Send;
    /// Store a message and bump the session's message count.
    fn add_chat_message(
        &self,
        session_id: i64,
        role: &str,
        content: &str,
    ) -> impl Future<Output = Result<()>> + Send;
    fn end_learning_session(&self, session_id: i64) -> impl Future<Output = Result<()>> + Send;
    fn get_chat_history(
        &self,
        session_id: i64,
    ) -> impl Future<Output = Result<Vec<ChatMessageRecord>>> + Send;
    fn get_session_details(
        &self,
        session_id: i64,
    ) -> impl Future<Output = Result<Option<SessionDetails>>> + Send;
    fn delete_session(&self, session_id: i64) -> impl Future<Output = Result<()>> + Send;
}

impl SessionOps for Database {
    async fn create_learning_session(&self, session: &NewLearningSession) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO learning_sessions
            (user_id, topic, persona, region, student_level, is_custom_guide)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.user_id)
        .bind(&session.topic)
        .bind(&session.persona)
        .bind(&session.region)
        .bind(&session.student_level)
        .bind(session.is_custom_guide)
        .execute(self.pool())
        .await?;

        let session_id = result.last_insert_rowid();
        tracing::info!(
            session_id,
            topic = %session.topic,
            persona = %session.persona,
            "created learning session"
        );
        Ok(session_id)
    }

    async fn get_learning_session(&self, session_id: i64) -> Result<Option<LearningSessionRecord>> {
        let session = sqlx::query_as::<_, LearningSessionRecord>(
            "SELECT * FROM learning_sessions WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(session)
    }

    async fn add_chat_message(&self, session_id: i64, role: &str, content: &str) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("INSERT INTO chat_messages (session_id, role, content) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(role)
            .bind(content)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE learning_sessions SET message_count = message_count + 1 WHERE session_id = ?",
        )
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(session_id, role, "message stored");
        Ok(())
    }

    async fn end_learning_session(&self, session_id: i64) -> Result<()> {
        sqlx::query("UPDATE learning_sessions SET ended_at = CURRENT_TIMESTAMP WHERE session_id = ?")
            .bind(session_id)
            .execute(self.pool())
            .await?;
        tracing::info!(session_id, "session ended");
        Ok(())
    }

    async fn get_chat_history(&self, session_id: i64) -> Result<Vec<ChatMessageRecord>> {
        let messages = sqlx::query_as::<_, ChatMessageRecord>(
            r#"
            SELECT * FROM chat_messages
            WHERE session_id = ?
            ORDER BY timestamp ASC, message_id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(self.pool())
        .await?;
        Ok(messages)
    }

    async fn get_session_details(&self, session_id: i64) -> Result<Option<SessionDetails>> {
        let Some(session) = self.get_learning_session(session_id).await? else {
            return Ok(None);
        };
        let messages = self.get_chat_history(session_id).await?;
        Ok(Some(SessionDetails { session, messages }))
    }

    async fn delete_session(&self, session_id: i64) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM learning_sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(session_id, "session and messages deleted");
        Ok(())
    }
}
