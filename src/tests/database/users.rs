//! User Database Tests
//!
//! Lookup order, preference updates and learning statistics.

use crate::database::{PreferencesUpdate, SessionOps, UserOps};
use crate::tests::common::{create_test_db, new_session};

#[tokio::test]
async fn test_create_user_generates_id_and_preferences() {
    let (db, _temp) = create_test_db().await;

    let user = db
        .get_or_create_user(None, "Ada", "Europe", Some("ada@example.com"))
        .await
        .expect("Failed to create user");

    assert!(uuid::Uuid::parse_str(&user.user_id).is_ok());
    assert_eq!(user.username.as_deref(), Some("Ada"));
    assert_eq!(user.preferred_region.as_deref(), Some("Europe"));

    let prefs = db
        .get_user_preferences(&user.user_id)
        .await
        .expect("Failed to get preferences")
        .expect("Preferences row missing");
    assert!(prefs.favorite_topics().is_empty());
    assert!(prefs.favorite_personas().is_empty());
    assert_eq!(prefs.preferred_level.as_deref(), Some("beginner"));
}

#[tokio::test]
async fn test_lookup_by_email_updates_username() {
    let (db, _temp) = create_test_db().await;

    let first = db
        .get_or_create_user(None, "Ada", "Global", Some("ada@example.com"))
        .await
        .expect("Failed to create user");
    let second = db
        .get_or_create_user(Some("other-id"), "Ada Lovelace", "Global", Some("ada@example.com"))
        .await
        .expect("Failed to look up user");

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(second.username.as_deref(), Some("Ada Lovelace"));
    assert!(db.get_user("other-id").await.expect("query failed").is_none());
}

#[tokio::test]
async fn test_lookup_by_id_when_no_email() {
    let (db, _temp) = create_test_db().await;

    db.get_or_create_user(Some("learner-1"), "Sam", "Asia", None)
        .await
        .expect("Failed to create user");
    let again = db
        .get_or_create_user(Some("learner-1"), "Someone Else", "Global", None)
        .await
        .expect("Failed to look up user");

    assert_eq!(again.user_id, "learner-1");
    // Username only changes on an email match
    assert_eq!(again.username.as_deref(), Some("Sam"));
    assert_eq!(again.preferred_region.as_deref(), Some("Asia"));
}

#[tokio::test]
async fn test_update_preferences_only_touches_given_fields() {
    let (db, _temp) = create_test_db().await;
    db.get_or_create_user(Some("u1"), "Kim", "Global", None)
        .await
        .expect("Failed to create user");

    db.update_user_preferences(
        "u1",
        &PreferencesUpdate {
            favorite_topics: Some(vec!["Physics".into(), "Jazz".into()]),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to update topics");

    db.update_user_preferences(
        "u1",
        &PreferencesUpdate {
            preferred_level: Some("advanced".into()),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to update level");

    let prefs = db
        .get_user_preferences("u1")
        .await
        .expect("query failed")
        .expect("Preferences row missing");
    assert_eq!(prefs.favorite_topics(), vec!["Physics", "Jazz"]);
    assert!(prefs.favorite_personas().is_empty());
    assert_eq!(prefs.preferred_level.as_deref(), Some("advanced"));
}

#[tokio::test]
async fn test_empty_preference_update_is_noop() {
    let (db, _temp) = create_test_db().await;
    db.get_or_create_user(Some("u2"), "Lee", "Global", None)
        .await
        .expect("Failed to create user");

    db.update_user_preferences("u2", &PreferencesUpdate::default())
        .await
        .expect("Empty update should succeed");
    // Unknown users are not an error either
    db.update_user_preferences("ghost", &PreferencesUpdate::default())
        .await
        .expect("Empty update should succeed");
}

#[tokio::test]
async fn test_user_stats() {
    let (db, _temp) = create_test_db().await;
    db.get_or_create_user(Some("stats"), "Stat", "Global", None)
        .await
        .expect("Failed to create user");

    let plan = [
        ("Physics", "Richard Feynman", 2),
        ("Physics", "Marie Curie", 1),
        ("Physics", "Richard Feynman", 0),
        ("Jazz", "Richard Feynman", 3),
    ];
    let mut ids = Vec::new();
    for (topic, persona, messages) in plan {
        let id = db
            .create_learning_session(&new_session("stats", topic, persona))
            .await
            .expect("Failed to create session");
        for i in 0..messages {
            db.add_chat_message(id, "user", &format!("message {i}"))
                .await
                .expect("Failed to add message");
        }
        ids.push(id);
    }

    let stats = db.get_user_stats("stats").await.expect("Failed to get stats");

    assert_eq!(stats.total_sessions, 4);
    assert_eq!(stats.total_messages, 6);
    assert_eq!(stats.favorite_topics[0].topic, "Physics");
    assert_eq!(stats.favorite_topics[0].count, 3);
    assert_eq!(stats.favorite_personas[0].persona, "Richard Feynman");
    assert_eq!(stats.favorite_personas[0].count, 3);
    assert_eq!(stats.all_sessions.len(), 4);
    assert_eq!(stats.recent_sessions.len(), 4);
    assert_eq!(stats.all_sessions[0].session_id, ids[3]);
}

#[tokio::test]
async fn test_stats_for_unknown_user_are_zero() {
    let (db, _temp) = create_test_db().await;

    let stats = db.get_user_stats("nobody").await.expect("Failed to get stats");
    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.total_messages, 0);
    assert!(stats.all_sessions.is_empty());
}
