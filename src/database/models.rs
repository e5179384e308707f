//! Database record types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub user_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub preferred_region: Option<String>,
    pub created_at: NaiveDateTime,
    pub last_active: NaiveDateTime,
}

impl UserRecord {
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("Anonymous")
    }
}

/// One tutoring conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LearningSessionRecord {
    pub session_id: i64,
    pub user_id: Option<String>,
    pub topic: String,
    pub persona: String,
    pub region: Option<String>,
    pub student_level: Option<String>,
    pub is_custom_guide: bool,
    pub started_at: NaiveDateTime,
    pub ended_at: Option<NaiveDateTime>,
    pub message_count: i64,
}

/// Fields supplied when a session starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLearningSession {
    pub user_id: String,
    pub topic: String,
    pub persona: String,
    pub region: String,
    pub student_level: String,
    pub is_custom_guide: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatMessageRecord {
    pub message_id: i64,
    pub session_id: i64,
    pub role: String, // "user" or "assistant"
    pub content: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserPreferencesRecord {
    pub user_id: String,
    pub favorite_personas: Option<String>, // JSON array
    pub favorite_topics: Option<String>,   // JSON array
    pub preferred_level: Option<String>,
    pub total_sessions: i64,
    pub total_messages: i64,
}

impl UserPreferencesRecord {
    pub fn favorite_personas(&self) -> Vec<String> {
        decode_list(self.favorite_personas.as_deref())
    }

    pub fn favorite_topics(&self) -> Vec<String> {
        decode_list(self.favorite_topics.as_deref())
    }
}

fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Partial preference update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub favorite_topics: Option<Vec<String>>,
    pub favorite_personas: Option<Vec<String>>,
    pub preferred_level: Option<String>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        self.favorite_topics.is_none()
            && self.favorite_personas.is_none()
            && self.preferred_level.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnalyticsEventRecord {
    pub id: i64,
    pub event_type: String,
    pub event_data: Option<String>, // JSON
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TopicCount {
    pub topic: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PersonaCount {
    pub persona: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SessionSummary {
    pub session_id: i64,
    pub topic: String,
    pub persona: String,
    pub started_at: NaiveDateTime,
    pub message_count: i64,
}

/// Aggregated learning statistics for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_sessions: i64,
    pub total_messages: i64,
    pub favorite_topics: Vec<TopicCount>,
    pub favorite_personas: Vec<PersonaCount>,
    pub recent_sessions: Vec<SessionSummary>,
    pub all_sessions: Vec<SessionSummary>,
}

/// A session together with its transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub session: LearningSessionRecord,
    pub messages: Vec<ChatMessageRecord>,
}
