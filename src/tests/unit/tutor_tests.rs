//! Tutor session tests
//!
//! The model is a scripted provider and the encyclopedia is a wiremock
//! server with no articles, so enrichment falls back to model-only context.

use std::sync::Arc;

use tempfile::TempDir;
use wiremock::MockServer;

use crate::config::{TutorConfig, WikiConfig};
use crate::core::llm::{ChatRequest, MessageRole};
use crate::core::memory::{HashingEmbedder, MemoryStore};
use crate::core::persona::StudentLevel;
use crate::core::tutor::{
    StartParams, TutorError, TutorService, CONNECTION_ISSUE_PREFIX, OPENING_REQUEST,
};
use crate::core::wiki::{PersonaEnricher, WikipediaClient};
use crate::database::{AnalyticsOps, Database, SessionOps};
use crate::tests::common::{create_test_db, seed_user};
use crate::tests::mocks::{api_error, last_user_text, scripted_router, ScriptedProvider};

const PROFILE: &str = "Feynman explained physics with bongo drums and diagrams.";
const TUTOR_REPLY: &str = "Imagine electrons as tiny dancers.";

fn respond(request: &ChatRequest) -> crate::core::llm::Result<String> {
    let text = last_user_text(request);
    if request.system_prompt.is_some() {
        if text.contains("fail please") {
            return Err(api_error());
        }
        return Ok(format!("{TUTOR_REPLY} ({text})"));
    }
    if text.contains("Create a brief, accurate profile") {
        Ok(PROFILE.to_string())
    } else if text.contains("Recall 5 distinct") {
        Ok("- \"Nature cannot be fooled.\"".to_string())
    } else if text.contains("Rewrite the following") {
        Ok("quantum electrodynamics intuition".to_string())
    } else {
        Ok("ok".to_string())
    }
}

struct Fixture {
    service: TutorService,
    db: Database,
    memory: Arc<MemoryStore>,
    requests: Arc<std::sync::Mutex<Vec<ChatRequest>>>,
    _wiki: MockServer,
    _db_dir: TempDir,
    _memory_dir: TempDir,
}

async fn fixture(config: TutorConfig) -> Fixture {
    let (db, db_dir) = create_test_db().await;
    seed_user(&db, "learner").await;

    let provider = ScriptedProvider::new(respond);
    let requests = provider.requests();
    let llm = scripted_router(provider).await;

    let wiki_server = MockServer::start().await;
    let wiki = WikipediaClient::new(&WikiConfig {
        base_url: wiki_server.uri(),
        timeout_secs: 2,
        user_agent: "curio-tests".to_string(),
    })
    .expect("Failed to build wiki client");
    let enricher = Arc::new(PersonaEnricher::new(Arc::new(wiki), llm.clone()));

    let memory_dir = TempDir::new().expect("Failed to create memory dir");
    let memory = Arc::new(MemoryStore::open(
        memory_dir.path(),
        Arc::new(HashingEmbedder::new(64)),
    ));

    let service = TutorService::new(db.clone(), llm, enricher, memory.clone(), config);
    Fixture {
        service,
        db,
        memory,
        requests,
        _wiki: wiki_server,
        _db_dir: db_dir,
        _memory_dir: memory_dir,
    }
}

fn params() -> StartParams {
    StartParams {
        user_id: "learner".to_string(),
        username: "Ada".to_string(),
        topic: "Quantum physics".to_string(),
        persona: "Richard Feynman".to_string(),
        region: "Global".to_string(),
        level: StudentLevel::Beginner,
        is_custom: false,
    }
}

fn tutor_requests(requests: &std::sync::Mutex<Vec<ChatRequest>>) -> Vec<ChatRequest> {
    requests
        .lock()
        .expect("requests lock")
        .iter()
        .filter(|r| r.system_prompt.is_some())
        .cloned()
        .collect()
}

#[tokio::test]
async fn test_start_builds_prompt_and_records_session() {
    let fx = fixture(TutorConfig::default()).await;

    let session = fx.service.start(&params()).await.expect("start failed");

    let prompt = session.system_prompt();
    assert!(prompt.contains("PERSONA CONTEXT"));
    assert!(prompt.contains(PROFILE));
    assert!(prompt.contains("PERSONA KERNEL: Richard Feynman"));
    assert!(prompt.contains("Nature cannot be fooled."));

    let sent = tutor_requests(&fx.requests);
    assert_eq!(sent.len(), 1);
    assert_eq!(last_user_text(&sent[0]), OPENING_REQUEST);

    let stored = fx
        .db
        .get_chat_history(session.session_id())
        .await
        .expect("history query failed");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].role, "assistant");
    assert!(stored[0].content.starts_with(TUTOR_REPLY));

    let events = fx
        .db
        .get_analytics_events("session_started")
        .await
        .expect("events query failed");
    assert_eq!(events.len(), 1);
    let data: serde_json::Value =
        serde_json::from_str(events[0].event_data.as_deref().expect("event data")).expect("json");
    assert_eq!(data["persona"], "Richard Feynman");
    assert_eq!(data["is_custom"], false);
}

#[tokio::test]
async fn test_kernel_can_be_disabled() {
    let fx = fixture(TutorConfig {
        use_kernel: false,
        ..TutorConfig::default()
    })
    .await;

    let session = fx.service.start(&params()).await.expect("start failed");
    assert!(!session.system_prompt().contains("PERSONA KERNEL"));
}

#[tokio::test]
async fn test_send_stores_both_turns() {
    let fx = fixture(TutorConfig::default()).await;
    let mut session = fx.service.start(&params()).await.expect("start failed");

    let reply = session.send("What is a photon?").await.expect("send failed");
    assert!(reply.contains("What is a photon?"));

    let stored = fx
        .db
        .get_chat_history(session.session_id())
        .await
        .expect("history query failed");
    let roles: Vec<&str> = stored.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["assistant", "user", "assistant"]);

    // The model sees the whole conversation so far
    let sent = tutor_requests(&fx.requests);
    let last = sent.last().expect("no tutor request");
    assert_eq!(last.messages.len(), 3);
    assert_eq!(last.messages[0].content, OPENING_REQUEST);
}

#[tokio::test]
async fn test_memory_snippet_every_third_exchange() {
    let fx = fixture(TutorConfig::default()).await;
    let mut session = fx.service.start(&params()).await.expect("start failed");

    session.send("first question").await.expect("send failed");
    session.send("second question").await.expect("send failed");
    assert!(fx.memory.search_memory_by_topic("learner", "question", 5).await.is_empty());

    session.send("third question").await.expect("send failed");
    let hits = fx.memory.search_memory_by_topic("learner", "third question", 5).await;
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.starts_with("User asked: third question\nAssistant: "));
}

#[tokio::test]
async fn test_model_failure_becomes_unstored_notice() {
    let fx = fixture(TutorConfig::default()).await;
    let mut session = fx.service.start(&params()).await.expect("start failed");

    let notice = session.send("fail please").await.expect("send should not error");
    assert!(notice.starts_with(CONNECTION_ISSUE_PREFIX));
    assert_eq!(
        session.history().last().map(|m| m.content.as_str()),
        Some(notice.as_str())
    );

    let stored = fx
        .db
        .get_chat_history(session.session_id())
        .await
        .expect("history query failed");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].role, "user");

    // The failed turn is not replayed to the model
    session.send("try again").await.expect("send failed");
    let sent = tutor_requests(&fx.requests);
    let last = sent.last().expect("no tutor request");
    assert!(last.messages.iter().all(|m| m.content != "fail please"));
}

#[tokio::test]
async fn test_resume_restores_transcript_without_opening_call() {
    let fx = fixture(TutorConfig::default()).await;
    let session_id = {
        let mut session = fx.service.start(&params()).await.expect("start failed");
        session.send("What is spin?").await.expect("send failed");
        session.session_id()
    };
    let before = tutor_requests(&fx.requests).len();

    let resumed = fx
        .service
        .resume(session_id, "learner", "Ada")
        .await
        .expect("resume failed");

    assert_eq!(tutor_requests(&fx.requests).len(), before);
    let history = resumed.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[0].content, OPENING_REQUEST);
    assert_eq!(history[2].content, "What is spin?");
    assert_eq!(resumed.persona(), "Richard Feynman");
}

#[tokio::test]
async fn test_resume_unknown_session() {
    let fx = fixture(TutorConfig::default()).await;

    let result = fx.service.resume(4242, "learner", "Ada").await;
    assert!(matches!(result, Err(TutorError::SessionNotFound(4242))));
}

#[tokio::test]
async fn test_resume_rejects_other_learner() {
    let fx = fixture(TutorConfig::default()).await;
    seed_user(&fx.db, "intruder").await;
    let session_id = fx
        .service
        .start(&params())
        .await
        .expect("start failed")
        .session_id();

    let result = fx.service.resume(session_id, "intruder", "Eve").await;
    assert!(matches!(
        result,
        Err(TutorError::NotSessionOwner { session_id: id, ref user_id })
            if id == session_id && user_id == "intruder"
    ));
}

#[tokio::test]
async fn test_past_learning_reaches_prompt() {
    let fx = fixture(TutorConfig {
        rewrite_queries: false,
        ..TutorConfig::default()
    })
    .await;
    fx.memory
        .store_conversation_memory(
            "learner",
            "Quantum physics",
            "Niels Bohr",
            "User asked: what is a quantum?\nAssistant: a packet",
            7,
        )
        .await;

    let session = fx.service.start(&params()).await.expect("start failed");
    assert!(session
        .system_prompt()
        .contains("Previously learned about 'Quantum physics' with Niels Bohr"));
}

#[tokio::test]
async fn test_end_marks_session() {
    let fx = fixture(TutorConfig::default()).await;
    let session = fx.service.start(&params()).await.expect("start failed");

    session.end().await.expect("end failed");

    let record = fx
        .db
        .get_learning_session(session.session_id())
        .await
        .expect("query failed")
        .expect("session missing");
    assert!(record.ended_at.is_some());
}
