//! Analytics Database Tests

use serde_json::json;

use crate::database::{AnalyticsOps, SessionOps, DEFAULT_POPULAR_LIMIT};
use crate::tests::common::{create_test_db, new_session, seed_user};

#[tokio::test]
async fn test_log_event_with_and_without_data() {
    let (db, _temp) = create_test_db().await;

    let data = json!({"topic": "Jazz", "persona": "Miles Davis", "region": "Global", "is_custom": false});
    db.log_analytics_event("session_started", Some(&data))
        .await
        .expect("Failed to log event");
    db.log_analytics_event("session_started", None)
        .await
        .expect("Failed to log event");

    let events = db
        .get_analytics_events("session_started")
        .await
        .expect("Failed to get events");
    assert_eq!(events.len(), 2);

    let stored: serde_json::Value =
        serde_json::from_str(events[0].event_data.as_deref().expect("data missing"))
            .expect("stored data is not JSON");
    assert_eq!(stored, data);
    assert!(events[1].event_data.is_none());
}

#[tokio::test]
async fn test_popular_topics_and_personas() {
    let (db, _temp) = create_test_db().await;
    for user in ["a", "b", "c"] {
        seed_user(&db, user).await;
    }

    for (user, topic, persona) in [
        ("a", "Physics", "Albert Einstein"),
        ("b", "Physics", "Marie Curie"),
        ("c", "Physics", "Albert Einstein"),
        ("a", "Jazz", "Albert Einstein"),
        ("b", "Jazz", "Miles Davis"),
        ("c", "Cooking", "Julia Child"),
    ] {
        db.create_learning_session(&new_session(user, topic, persona))
            .await
            .expect("Failed to create session");
    }

    let topics = db
        .get_popular_topics(DEFAULT_POPULAR_LIMIT)
        .await
        .expect("Failed to get topics");
    assert_eq!(topics.len(), 3);
    assert_eq!((topics[0].topic.as_str(), topics[0].count), ("Physics", 3));
    assert_eq!((topics[1].topic.as_str(), topics[1].count), ("Jazz", 2));

    let personas = db.get_popular_personas(1).await.expect("Failed to get personas");
    assert_eq!(personas.len(), 1);
    assert_eq!(personas[0].persona, "Albert Einstein");
    assert_eq!(personas[0].count, 3);
}
