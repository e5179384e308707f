//! Analytics events and popularity queries

use std::future::Future;

use serde_json::Value;

use super::models::{AnalyticsEventRecord, PersonaCount, TopicCount};
use super::{Database, Result};

pub const DEFAULT_POPULAR_LIMIT: i64 = 10;

/// Extension trait for analytics database operations
pub trait AnalyticsOps {
    fn log_analytics_event(
        &self,
        event_type: &str,
        data: Option<&Value>,
    ) -> impl Future<Output = Result<()>> + Send;
    fn get_analytics_events(
        &self,
        event_type: &str,
    ) -> impl Future<Output = Result<Vec<AnalyticsEventRecord>>> + Send;
    fn get_popular_topics(&self, limit: i64) -> impl Future<Output = Result<Vec<TopicCount>>> + Send;
    fn get_popular_personas(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<PersonaCount>>> + Send;
}

impl AnalyticsOps for Database {
    async fn log_analytics_event(&self, event_type: &str, data: Option<&Value>) -> Result<()> {
        let encoded = data.map(serde_json::to_string).transpose()?;

        sqlx::query("INSERT INTO analytics (event_type, event_data) VALUES (?, ?)")
            .bind(event_type)
            .bind(encoded)
            .execute(self.pool())
            .await?;

        tracing::debug!(event_type, "analytics event logged");
        Ok(())
    }

    async fn get_analytics_events(&self, event_type: &str) -> Result<Vec<AnalyticsEventRecord>> {
        let events = sqlx::query_as::<_, AnalyticsEventRecord>(
            "SELECT * FROM analytics WHERE event_type = ? ORDER BY id ASC",
        )
        .bind(event_type)
        .fetch_all(self.pool())
        .await?;
        Ok(events)
    }

    async fn get_popular_topics(&self, limit: i64) -> Result<Vec<TopicCount>> {
        let topics = sqlx::query_as::<_, TopicCount>(
            r#"
            SELECT topic, COUNT(*) as count
            FROM learning_sessions
            GROUP BY topic
            ORDER BY count DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(topics)
    }

    async fn get_popular_personas(&self, limit: i64) -> Result<Vec<PersonaCount>> {
        let personas = sqlx::query_as::<_, PersonaCount>(
            r#"
            SELECT persona, COUNT(*) as count
            FROM learning_sessions
            GROUP BY persona
            ORDER BY count DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(personas)
    }
}
