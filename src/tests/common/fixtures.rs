//! Test fixtures shared across suites

use tempfile::TempDir;

use crate::database::{Database, NewLearningSession};

/// Create a migrated database in a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = Database::new(&temp_dir.path().join("curio_test.db"))
        .await
        .expect("Failed to create test database");
    (db, temp_dir)
}

pub fn new_session(user_id: &str, topic: &str, persona: &str) -> NewLearningSession {
    NewLearningSession {
        user_id: user_id.to_string(),
        topic: topic.to_string(),
        persona: persona.to_string(),
        region: "Global".to_string(),
        student_level: "Beginner".to_string(),
        is_custom_guide: false,
    }
}

/// Insert a user so sessions referencing it satisfy the foreign key.
pub async fn seed_user(db: &Database, user_id: &str) {
    use crate::database::UserOps;
    db.get_or_create_user(Some(user_id), user_id, "Global", None)
        .await
        .expect("Failed to seed user");
}
