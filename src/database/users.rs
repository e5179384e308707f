//! User, preference and statistics operations

use std::future::Future;

use super::models::{
    PersonaCount, PreferencesUpdate, SessionSummary, TopicCount, UserPreferencesRecord,
    UserRecord, UserStats,
};
use super::{Database, Result};
use sqlx::Row;

const FAVORITES_LIMIT: i64 = 5;
const RECENT_SESSIONS: usize = 5;

/// Extension trait for user-related database operations
pub trait UserOps {
    /// Find a user by email, then by id, creating one when neither matches.
    fn get_or_create_user(
        &self,
        user_id: Option<&str>,
        username: &str,
        preferred_region: &str,
        email: Option<&str>,
    ) -> impl Future<Output = Result<UserRecord>> + Send;
    fn get_user(&self, user_id: &str) -> impl Future<Output = Result<Option<UserRecord>>> + Send;
    fn get_user_preferences(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserPreferencesRecord>>> + Send;
    fn update_user_preferences(
        &self,
        user_id: &str,
        update: &PreferencesUpdate,
    ) -> impl Future<Output = Result<()>> + Send;
    fn get_user_stats(&self, user_id: &str) -> impl Future<Output = Result<UserStats>> + Send;
}

impl UserOps for Database {
    async fn get_or_create_user(
        &self,
        user_id: Option<&str>,
        username: &str,
        preferred_region: &str,
        email: Option<&str>,
    ) -> Result<UserRecord> {
        let mut existing = None;

        if let Some(email) = email {
            existing = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(self.pool())
                .await?;

            if let Some(user) = &existing {
                tracing::debug!(email, "found existing user by email");
                if !username.is_empty() && user.username.as_deref() != Some(username) {
                    sqlx::query("UPDATE users SET username = ? WHERE email = ?")
                        .bind(username)
                        .bind(email)
                        .execute(self.pool())
                        .await?;
                }
            }
        }

        if existing.is_none() {
            if let Some(id) = user_id {
                existing = self.get_user(id).await?;
            }
        }

        let actual_id = match existing {
            Some(user) => {
                sqlx::query("UPDATE users SET last_active = CURRENT_TIMESTAMP WHERE user_id = ?")
                    .bind(&user.user_id)
                    .execute(self.pool())
                    .await?;
                user.user_id
            }
            None => {
                let new_id = user_id
                    .map(str::to_string)
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                tracing::info!(user_id = %new_id, username, "creating new user");

                let mut tx = self.pool().begin().await?;
                sqlx::query(
                    "INSERT INTO users (user_id, username, email, preferred_region) VALUES (?, ?, ?, ?)",
                )
                .bind(&new_id)
                .bind(username)
                .bind(email)
                .bind(preferred_region)
                .execute(&mut *tx)
                .await?;
                sqlx::query(
                    "INSERT INTO user_preferences (user_id, favorite_personas, favorite_topics) VALUES (?, '[]', '[]')",
                )
                .bind(&new_id)
                .execute(&mut *tx)
                .await?;
                tx.commit().await?;
                new_id
            }
        };

        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
            .bind(&actual_id)
            .fetch_one(self.pool())
            .await?;
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferencesRecord>> {
        let prefs = sqlx::query_as::<_, UserPreferencesRecord>(
            "SELECT * FROM user_preferences WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(prefs)
    }

    async fn update_user_preferences(&self, user_id: &str, update: &PreferencesUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::new();
        let mut values = Vec::new();
        if let Some(topics) = &update.favorite_topics {
            assignments.push("favorite_topics = ?");
            values.push(serde_json::to_string(topics)?);
        }
        if let Some(personas) = &update.favorite_personas {
            assignments.push("favorite_personas = ?");
            values.push(serde_json::to_string(personas)?);
        }
        if let Some(level) = &update.preferred_level {
            assignments.push("preferred_level = ?");
            values.push(level.clone());
        }

        let sql = format!(
            "UPDATE user_preferences SET {} WHERE user_id = ?",
            assignments.join(", ")
        );
        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }
        query.bind(user_id).execute(self.pool()).await?;

        tracing::debug!(user_id, "user preferences updated");
        Ok(())
    }

    async fn get_user_stats(&self, user_id: &str) -> Result<UserStats> {
        let totals = sqlx::query(
            r#"
            SELECT COUNT(*) as total_sessions,
                   COALESCE(SUM(message_count), 0) as total_messages
            FROM learning_sessions
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        let favorite_topics = sqlx::query_as::<_, TopicCount>(
            r#"
            SELECT topic, COUNT(*) as count
            FROM learning_sessions
            WHERE user_id = ?
            GROUP BY topic
            ORDER BY count DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(FAVORITES_LIMIT)
        .fetch_all(self.pool())
        .await?;

        let favorite_personas = sqlx::query_as::<_, PersonaCount>(
            r#"
            SELECT persona, COUNT(*) as count
            FROM learning_sessions
            WHERE user_id = ?
            GROUP BY persona
            ORDER BY count DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(FAVORITES_LIMIT)
        .fetch_all(self.pool())
        .await?;

        let all_sessions = sqlx::query_as::<_, SessionSummary>(
            r#"
            SELECT session_id, topic, persona, started_at, message_count
            FROM learning_sessions
            WHERE user_id = ?
            ORDER BY started_at DESC, session_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        let recent_sessions = all_sessions.iter().take(RECENT_SESSIONS).cloned().collect();

        Ok(UserStats {
            total_sessions: totals.get::<i64, _>("total_sessions"),
            total_messages: totals.get::<i64, _>("total_messages"),
            favorite_topics,
            favorite_personas,
            recent_sessions,
            all_sessions,
        })
    }
}
