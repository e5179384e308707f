//! Session Database Tests
//!
//! Sessions, transcripts and deletion.

use crate::database::{SessionOps, UserOps};
use crate::tests::common::{create_test_db, new_session, seed_user};

#[tokio::test]
async fn test_create_and_get_session() {
    let (db, _temp) = create_test_db().await;
    db.get_or_create_user(Some("u"), "U", "Global", None)
        .await
        .expect("Failed to create user");

    let mut params = new_session("u", "Quantum computing", "Peter Shor");
    params.is_custom_guide = true;
    let id = db
        .create_learning_session(&params)
        .await
        .expect("Failed to create session");

    let session = db
        .get_learning_session(id)
        .await
        .expect("query failed")
        .expect("Session not found");
    assert_eq!(session.topic, "Quantum computing");
    assert_eq!(session.persona, "Peter Shor");
    assert!(session.is_custom_guide);
    assert_eq!(session.message_count, 0);
    assert!(session.ended_at.is_none());
}

#[tokio::test]
async fn test_messages_increment_count_and_keep_order() {
    let (db, _temp) = create_test_db().await;
    db.get_or_create_user(Some("u"), "U", "Global", None)
        .await
        .expect("Failed to create user");
    let id = db
        .create_learning_session(&new_session("u", "Poetry", "Rumi"))
        .await
        .expect("Failed to create session");

    for (role, text) in [("assistant", "hello"), ("user", "hi"), ("assistant", "shall we?")] {
        db.add_chat_message(id, role, text)
            .await
            .expect("Failed to add message");
    }

    let history = db.get_chat_history(id).await.expect("Failed to get history");
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hello", "hi", "shall we?"]);
    assert_eq!(history[1].role, "user");

    let session = db
        .get_learning_session(id)
        .await
        .expect("query failed")
        .expect("Session not found");
    assert_eq!(session.message_count, 3);
}

#[tokio::test]
async fn test_end_session_sets_ended_at() {
    let (db, _temp) = create_test_db().await;
    seed_user(&db, "u").await;
    let id = db
        .create_learning_session(&new_session("u", "Chess", "Judit Polgar"))
        .await
        .expect("Failed to create session");

    db.end_learning_session(id).await.expect("Failed to end session");

    let session = db
        .get_learning_session(id)
        .await
        .expect("query failed")
        .expect("Session not found");
    assert!(session.ended_at.is_some());
}

#[tokio::test]
async fn test_session_details() {
    let (db, _temp) = create_test_db().await;
    seed_user(&db, "u").await;
    let id = db
        .create_learning_session(&new_session("u", "Astronomy", "Carl Sagan"))
        .await
        .expect("Failed to create session");
    db.add_chat_message(id, "assistant", "Billions of stars")
        .await
        .expect("Failed to add message");

    let details = db
        .get_session_details(id)
        .await
        .expect("query failed")
        .expect("Details missing");
    assert_eq!(details.session.session_id, id);
    assert_eq!(details.messages.len(), 1);

    assert!(db.get_session_details(id + 100).await.expect("query failed").is_none());
}

#[tokio::test]
async fn test_delete_session_removes_messages() {
    let (db, _temp) = create_test_db().await;
    seed_user(&db, "u").await;
    let keep = db
        .create_learning_session(&new_session("u", "Art", "Frida Kahlo"))
        .await
        .expect("Failed to create session");
    let doomed = db
        .create_learning_session(&new_session("u", "Art", "Pablo Picasso"))
        .await
        .expect("Failed to create session");
    db.add_chat_message(keep, "user", "keep me").await.expect("add failed");
    db.add_chat_message(doomed, "user", "drop me").await.expect("add failed");

    db.delete_session(doomed).await.expect("Failed to delete session");

    assert!(db.get_learning_session(doomed).await.expect("query failed").is_none());
    assert!(db.get_chat_history(doomed).await.expect("query failed").is_empty());
    assert_eq!(db.get_chat_history(keep).await.expect("query failed").len(), 1);
}
