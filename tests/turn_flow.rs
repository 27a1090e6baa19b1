//! Integration tests for the full turn flow.
//!
//! These tests verify the end-to-end path:
//! 1. A turn routes through the coordinator to a specialist
//! 2. The specialist's operation executes against session state
//! 3. State changes persist across turns and respect the business rules
//!    (ownership uniqueness, the 30-day refund window, the append-only log)
//!
//! Uses the scripted reasoning engine and the in-memory store, so the flow
//! runs without external dependencies.

use std::sync::Arc;

use serde_json::json;

use course_concierge::adapters::{InMemorySessionStore, ScriptedEngine, YamlFileSessionStore};
use course_concierge::application::{SubmitTurnCommand, SubmitTurnHandler};
use course_concierge::domain::agents::AgentKind;
use course_concierge::domain::catalog::default_catalog;
use course_concierge::domain::foundation::{Timestamp, UserId};
use course_concierge::domain::operations::{
    OperationError, OperationOutcome, OperationRegistry, PURCHASE_COURSE, REFUND_COURSE,
};
use course_concierge::domain::session::{LogAction, SessionState};
use course_concierge::ports::SessionStore;

const COURSE: &str = "prompt_engineering_deep_dive";

fn handler_with_store(
    engine: ScriptedEngine,
    store: Arc<dyn SessionStore>,
) -> SubmitTurnHandler {
    SubmitTurnHandler::new(
        store,
        Arc::new(engine),
        Arc::new(default_catalog().clone()),
        OperationRegistry::new(),
    )
}

/// Builds a state that already owns `course_id`, purchased `days_ago` days
/// in the past, with the matching log entry. Goes through serde because
/// state mutation is otherwise reserved for operation execution.
fn owned_state(course_id: &str, days_ago: i64) -> SessionState {
    let purchased_at = Timestamp::now().minus_days(days_ago);
    serde_json::from_value(json!({
        "display_name": "Valued Customer",
        "owned_courses": [
            { "course_id": course_id, "purchased_at": purchased_at }
        ],
        "interaction_log": [
            { "action": "purchase", "course_id": course_id, "timestamp": purchased_at }
        ]
    }))
    .expect("well-formed state document")
}

#[tokio::test]
async fn purchase_flow_records_ownership_and_price() {
    let engine = ScriptedEngine::new()
        .with_transfer("sales")
        .with_invocation(PURCHASE_COURSE, json!({ "course_id": COURSE }))
        .with_reply("Enjoy the Prompt Engineering Deep Dive!");
    let store = Arc::new(InMemorySessionStore::new());
    let handler = handler_with_store(engine, store.clone());

    let result = handler
        .handle(SubmitTurnCommand::new("web_user", "I'd like the prompt course"))
        .await
        .unwrap();

    assert_eq!(result.agent, AgentKind::Sales);
    let outcome = result.executed_operation.expect("operation ran");
    match &outcome {
        OperationOutcome::Success { payload, .. } => {
            assert_eq!(payload["course_id"], COURSE);
            assert_eq!(payload["price"], 79);
        }
        OperationOutcome::Error { error, .. } => panic!("unexpected failure: {error}"),
    }

    let session = store.load(&result.session_id).await.unwrap();
    assert!(session.state().owns(COURSE));
    assert_eq!(session.state().interaction_log().len(), 1);
    assert_eq!(session.state().interaction_log()[0].action, LogAction::Purchase);
}

#[tokio::test]
async fn repeat_purchase_is_rejected_and_state_unchanged() {
    let engine = ScriptedEngine::new()
        // First turn: successful purchase.
        .with_transfer("sales")
        .with_invocation(PURCHASE_COURSE, json!({ "course_id": COURSE }))
        .with_reply("done")
        // Second turn: the same purchase again.
        .with_transfer("sales")
        .with_invocation(PURCHASE_COURSE, json!({ "course_id": COURSE }))
        .with_reply("You already own that course.");
    let store = Arc::new(InMemorySessionStore::new());
    let handler = handler_with_store(engine, store.clone());

    handler
        .handle(SubmitTurnCommand::new("web_user", "buy it"))
        .await
        .unwrap();
    let result = handler
        .handle(SubmitTurnCommand::new("web_user", "buy it again"))
        .await
        .unwrap();

    assert!(matches!(
        result.executed_operation.as_ref().and_then(OperationOutcome::error),
        Some(OperationError::AlreadyOwned { .. })
    ));

    let session = store.load(&result.session_id).await.unwrap();
    assert_eq!(session.state().owned_courses().len(), 1);
    assert_eq!(session.state().interaction_log().len(), 1);
}

#[tokio::test]
async fn refund_outside_the_window_is_refused() {
    let engine = ScriptedEngine::new()
        .with_transfer("orders")
        .with_invocation(REFUND_COURSE, json!({ "course_id": COURSE }))
        .with_reply("That purchase is past the 30-day refund window.");
    let store = Arc::new(InMemorySessionStore::new());

    let user = UserId::from("web_user");
    store.create(&user, owned_state(COURSE, 31)).await.unwrap();

    let handler = handler_with_store(engine, store.clone());
    let result = handler
        .handle(SubmitTurnCommand::new("web_user", "refund my course"))
        .await
        .unwrap();

    assert!(matches!(
        result.executed_operation.as_ref().and_then(OperationOutcome::error),
        Some(OperationError::RefundWindowExpired { window_days: 30, .. })
    ));

    // Refusal leaves ownership and the log untouched.
    let session = store.load(&result.session_id).await.unwrap();
    assert!(session.state().owns(COURSE));
    assert_eq!(session.state().interaction_log().len(), 1);
}

#[tokio::test]
async fn refund_inside_the_window_removes_ownership() {
    let engine = ScriptedEngine::new()
        .with_transfer("orders")
        .with_invocation(REFUND_COURSE, json!({ "course_id": COURSE }))
        .with_reply("Refund processed; expect the money back in 3-5 business days.");
    let store = Arc::new(InMemorySessionStore::new());

    let user = UserId::from("web_user");
    store.create(&user, owned_state(COURSE, 10)).await.unwrap();

    let handler = handler_with_store(engine, store.clone());
    let result = handler
        .handle(SubmitTurnCommand::new("web_user", "refund my course"))
        .await
        .unwrap();

    assert_eq!(result.agent, AgentKind::Orders);
    let outcome = result.executed_operation.expect("operation ran");
    assert!(outcome.is_success());

    let session = store.load(&result.session_id).await.unwrap();
    assert!(!session.state().owns(COURSE));

    let actions: Vec<LogAction> = session
        .state()
        .interaction_log()
        .iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec![LogAction::Purchase, LogAction::Refund]);
}

#[tokio::test]
async fn distinct_users_never_share_state() {
    let engine = ScriptedEngine::new()
        .with_transfer("sales")
        .with_invocation(PURCHASE_COURSE, json!({ "course_id": COURSE }))
        .with_reply("done")
        .with_transfer("orders")
        .with_invocation(REFUND_COURSE, json!({ "course_id": COURSE }))
        .with_reply("You don't own that course.");
    let store = Arc::new(InMemorySessionStore::new());
    let handler = handler_with_store(engine, store.clone());

    let buyer = handler
        .handle(SubmitTurnCommand::new("buyer", "buy the prompt course"))
        .await
        .unwrap();

    // The second user's refund must not see the first user's purchase.
    let other = handler
        .handle(SubmitTurnCommand::new("someone_else", "refund the prompt course"))
        .await
        .unwrap();

    assert_ne!(buyer.session_id, other.session_id);
    assert!(matches!(
        other.executed_operation.as_ref().and_then(OperationOutcome::error),
        Some(OperationError::NotOwned { .. })
    ));
    let buyer_session = store.load(&buyer.session_id).await.unwrap();
    assert!(buyer_session.state().owns(COURSE));
}

#[tokio::test]
async fn turn_flow_works_against_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ScriptedEngine::new()
        .with_transfer("sales")
        .with_invocation(PURCHASE_COURSE, json!({ "course_id": COURSE }))
        .with_reply("Enjoy!");
    let store = Arc::new(YamlFileSessionStore::new(dir.path()));
    let handler = handler_with_store(engine, store.clone());

    let first = handler
        .handle(SubmitTurnCommand::new("web_user", "buy the prompt course"))
        .await
        .unwrap();

    // Reload through a fresh store instance over the same directory.
    let reopened = Arc::new(YamlFileSessionStore::new(dir.path()));
    let session = reopened.load(&first.session_id).await.unwrap();
    assert!(session.state().owns(COURSE));

    let handler = handler_with_store(
        ScriptedEngine::new().with_reply("Welcome back!"),
        reopened.clone(),
    );
    let second = handler
        .handle(SubmitTurnCommand::new("web_user", "hello again"))
        .await
        .unwrap();
    assert_eq!(first.session_id, second.session_id);
}
