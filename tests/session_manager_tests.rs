use diy_assistant::services::chat_session::{ChatSession, Message, WELCOME_MESSAGE};
use diy_assistant::services::session_manager::SessionManager;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn basic_session_flow() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.create_session().await;
    assert!(!sid.is_empty());
    assert_eq!(mgr.len().await, 1);

    let handle = mgr.get(&sid).await.unwrap();
    assert_eq!(handle.lock().await.transcript(), &[Message::bot(WELCOME_MESSAGE)]);
    assert!(mgr.remove_session(&sid).await);
    assert!(mgr.is_empty().await);
}

#[tokio::test]
async fn test_session_expiration() {
    let mgr = SessionManager::new(Duration::from_millis(10));
    let sid = mgr.create_session().await;

    // Wait for expiration
    sleep(Duration::from_millis(20)).await;

    let removed_count = mgr.purge_expired().await;
    assert_eq!(removed_count, 1, "Should have removed 1 expired session");
    assert!(
        !mgr.remove_session(&sid).await,
        "Session should already be gone"
    );
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let a = mgr.insert(ChatSession::new("a")).await;
    let b = mgr.insert(ChatSession::new("b")).await;

    a.lock().await.toggle();
    assert!(a.lock().await.set_draft("build a shed"));
    assert!(b.lock().await.state().draft_input.is_empty());
    assert!(!b.lock().await.set_draft("nope"));
}

#[tokio::test]
async fn test_busy_session_survives_purge() {
    let mgr = SessionManager::new(Duration::from_millis(10));
    let handle = mgr.insert(ChatSession::new("busy")).await;
    let _guard = handle.lock().await;

    sleep(Duration::from_millis(20)).await;
    assert_eq!(mgr.purge_expired().await, 0);
    assert!(mgr.get("busy").await.is_some());
}
