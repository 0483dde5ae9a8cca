use chrono::{DateTime, Duration, TimeZone, Utc};
use convokeep::config::DatabaseConfig;
use convokeep::db::{connection::IN_MEMORY, get_connection, service::DbService, DbPool, DocumentStore, StoreError};
use convokeep::services::{Clock, ConversationService, ServiceError, UserService};
use convokeep::validation::{ConversationDraft, ValidationError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Advances one second per reading.
struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    fn starting_at(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { next: Mutex::new(start) })
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

struct FrozenClock(DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap()
}

fn pool() -> DbPool {
    get_connection(&DatabaseConfig {
        path: IN_MEMORY.to_string(),
        timeout_ms: 5_000,
    })
    .unwrap()
}

fn store(pool: &DbPool) -> DocumentStore {
    DocumentStore::new(pool.clone(), std::time::Duration::from_secs(5))
}

fn draft(session_id: &str, messages: Value) -> ConversationDraft {
    ConversationDraft {
        session_id: Some(json!(session_id)),
        messages: Some(messages),
    }
}

#[tokio::test]
async fn save_then_load_returns_last_saved_messages() {
    let pool = pool();
    let service = ConversationService::new(store(&pool), SteppingClock::starting_at(start()));

    service.save(draft("s1", json!([{"role": "user", "text": "hi"}]))).await.unwrap();
    let first = service.fetch("s1").await.unwrap().unwrap();

    service
        .save(draft("s1", json!([{"role": "user", "text": "hi"}, {"role": "assistant", "text": "hello"}])))
        .await
        .unwrap();
    let second = service.fetch("s1").await.unwrap().unwrap();

    assert_eq!(
        service.load("s1").await.unwrap(),
        Some(json!([{"role": "user", "text": "hi"}, {"role": "assistant", "text": "hello"}]))
    );
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
async fn frozen_clock_keeps_timestamps_equal() {
    let pool = pool();
    let service = ConversationService::new(store(&pool), Arc::new(FrozenClock(start())));

    service.save(draft("s1", json!([]))).await.unwrap();
    service.save(draft("s1", json!([1, 2]))).await.unwrap();

    let conversation = service.fetch("s1").await.unwrap().unwrap();
    assert_eq!(conversation.created_at, start());
    assert_eq!(conversation.updated_at, start());
    assert_eq!(conversation.messages, json!([1, 2]));
}

#[tokio::test]
async fn absent_sessions_are_not_errors() {
    let pool = pool();
    let service = ConversationService::new(store(&pool), SteppingClock::starting_at(start()));

    assert_eq!(service.load("never-saved").await.unwrap(), None);
    assert_eq!(service.remove("never-saved").await.unwrap(), 0);
}

#[tokio::test]
async fn remove_after_save_deletes_exactly_one() {
    let pool = pool();
    let service = ConversationService::new(store(&pool), SteppingClock::starting_at(start()));

    service.save(draft("s1", json!([]))).await.unwrap();
    service.save(draft("s2", json!([]))).await.unwrap();

    assert_eq!(service.remove("s1").await.unwrap(), 1);
    assert_eq!(service.load("s1").await.unwrap(), None);
    assert_eq!(service.load("s2").await.unwrap(), Some(json!([])));
}

#[tokio::test]
async fn invalid_save_writes_nothing() {
    let pool = pool();
    let service = ConversationService::new(store(&pool), SteppingClock::starting_at(start()));

    let missing_messages = ConversationDraft {
        session_id: Some(json!("s1")),
        messages: None,
    };
    let err = service.save(missing_messages).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidPayload(ValidationError::Missing("messages"))));

    assert!(service.list(10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_session_id_is_rejected_on_read_and_delete() {
    let pool = pool();
    let service = ConversationService::new(store(&pool), SteppingClock::starting_at(start()));

    assert!(matches!(service.load("").await, Err(ServiceError::InvalidPayload(_))));
    assert!(matches!(service.remove("").await, Err(ServiceError::InvalidPayload(_))));
}

#[tokio::test]
async fn store_timeout_surfaces_as_unavailable() {
    let pool = pool();
    let store = DocumentStore::new(pool.clone(), std::time::Duration::from_millis(50));

    let err = store
        .run(|conn| {
            std::thread::sleep(std::time::Duration::from_millis(200));
            DbService::get_conversation(conn, "s1")
        })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Timeout(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_call_does_not_block_other_keys() {
    let pool = pool();
    let slow_store = DocumentStore::new(pool.clone(), std::time::Duration::from_secs(5));
    let service = ConversationService::new(
        DocumentStore::new(pool.clone(), std::time::Duration::from_millis(300)),
        SteppingClock::starting_at(start()),
    );
    service.save(draft("other-key", json!(["ready"]))).await.unwrap();

    let slow = tokio::spawn(async move {
        slow_store
            .run(|conn| {
                std::thread::sleep(std::time::Duration::from_millis(600));
                DbService::get_conversation(conn, "slow-key")
            })
            .await
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(service.load("other-key").await.unwrap(), Some(json!(["ready"])));
    assert!(slow.await.unwrap().unwrap().is_none());
}

#[tokio::test]
async fn timed_out_call_does_not_poison_later_calls() {
    let pool = pool();
    let store = DocumentStore::new(pool.clone(), std::time::Duration::from_millis(50));
    let service = ConversationService::new(store.clone(), SteppingClock::starting_at(start()));

    let _ = store
        .run(|conn| {
            std::thread::sleep(std::time::Duration::from_millis(300));
            DbService::get_conversation(conn, "s1")
        })
        .await;

    assert_eq!(service.load("s1").await.unwrap(), None);
}

#[tokio::test]
async fn user_save_refreshes_login_and_keeps_created_at() {
    let pool = pool();
    let service = UserService::new(store(&pool), SteppingClock::starting_at(start()));

    let user = json!({"sub": "g-1", "email": "ada@example.com", "name": "Ada", "emailVerified": true});
    assert_eq!(service.save(Some(&user)).await.unwrap(), "g-1");
    let renamed = json!({"sub": "g-1", "email": "ada@example.com", "name": "Ada King"});
    service.save(Some(&renamed)).await.unwrap();

    let stored = service.find("g-1").await.unwrap().unwrap();
    assert_eq!(stored.name, "Ada King");
    assert_eq!(stored.email_verified, Some(true));
    assert_eq!(stored.created_at, start());
    assert_eq!(stored.last_login_at, start() + Duration::seconds(1));
}

#[tokio::test]
async fn invalid_user_is_not_stored() {
    let pool = pool();
    let service = UserService::new(store(&pool), SteppingClock::starting_at(start()));

    let user = json!({"email": "ada@example.com", "name": "Ada", "emailVerified": "yes"});
    assert!(matches!(
        service.save(Some(&user)).await,
        Err(ServiceError::InvalidPayload(ValidationError::WrongType { field: "emailVerified", .. }))
    ));
    assert!(service.find("ada@example.com").await.unwrap().is_none());
}
