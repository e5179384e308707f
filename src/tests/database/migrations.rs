//! Migration Tests

use sqlx::Row;

use crate::database::{run_migrations, AnalyticsOps, Database};
use crate::tests::common::create_test_db;

#[tokio::test]
async fn test_all_tables_created() {
    let (db, _temp) = create_test_db().await;

    let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(db.pool())
        .await
        .expect("Failed to list tables");
    let tables: Vec<String> = rows.iter().map(|r| r.get::<String, _>("name")).collect();

    for expected in [
        "_migrations",
        "analytics",
        "chat_messages",
        "learning_sessions",
        "user_preferences",
        "users",
    ] {
        assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (db, _temp) = create_test_db().await;

    run_migrations(db.pool()).await.expect("Second migration run failed");

    let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM _migrations")
        .fetch_one(db.pool())
        .await
        .expect("Failed to count migrations")
        .get("count");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_reopen_keeps_data() {
    let (db, _temp) = create_test_db().await;
    db.log_analytics_event("app_opened", None)
        .await
        .expect("Failed to log event");
    let path = db.path().to_path_buf();
    db.pool().close().await;

    let reopened = Database::new(&path).await.expect("Failed to reopen database");
    let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM analytics")
        .fetch_one(reopened.pool())
        .await
        .expect("Failed to count events")
        .get("count");
    assert_eq!(count, 1);
}
