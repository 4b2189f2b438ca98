use order_reconciler::domain::order::Order;
use order_reconciler::domain::outcome::{ReconcileError, ReconcileOutcome};
use order_reconciler::provider::mock::succeeded_event;
use order_reconciler::service::reconciler::Reconciler;
use order_reconciler::store::mock::MockStore;
use serde_json::Value;
use std::sync::Arc;

fn open_order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        email: Some("customer@example.com".to_string()),
        total: 5000,
        currency: "usd".to_string(),
        metadata: serde_json::Map::new(),
    }
}

fn reconciler(store: &Arc<MockStore>) -> Reconciler {
    Reconciler {
        store: store.clone(),
    }
}

fn activity_log(order: &Order) -> Vec<Value> {
    order
        .metadata
        .get("activity_log")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
async fn succeeded_event_stamps_target_order() {
    let store = Arc::new(MockStore::default());
    store.seed(open_order("order_42"));

    let event = succeeded_event("pi_1", 5000, &[("order_id", "order_42")]);
    let outcome = reconciler(&store).reconcile(&event, "webhook").await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::OrderUpdated {
            order_id: "order_42".to_string()
        }
    );

    let stored = store.order("order_42").unwrap();
    assert_eq!(stored.metadata.get("payment_captured"), Some(&Value::Bool(true)));
    assert_eq!(
        stored.metadata.get("payment_intent_id").and_then(Value::as_str),
        Some("pi_1")
    );
    assert!(stored.metadata.get("payment_confirmed_at").is_some());

    let log = activity_log(&stored);
    assert_eq!(log.len(), 1);
    assert_eq!(
        log[0].get("action").and_then(Value::as_str),
        Some("payment_confirmed")
    );
}

#[tokio::test]
async fn replayed_event_is_a_no_op() {
    let store = Arc::new(MockStore::default());
    store.seed(open_order("order_42"));
    let reconciler = reconciler(&store);

    let event = succeeded_event("pi_1", 5000, &[("order_id", "order_42")]);
    reconciler.reconcile(&event, "webhook").await.unwrap();
    let second = reconciler.reconcile(&event, "poller").await.unwrap();

    assert_eq!(
        second,
        ReconcileOutcome::AlreadyReconciled {
            order_id: "order_42".to_string()
        }
    );
    assert_eq!(activity_log(&store.order("order_42").unwrap()).len(), 1);
}

#[tokio::test]
async fn event_without_correlation_never_mutates() {
    let store = Arc::new(MockStore::default());

    let event = succeeded_event("pi_2", 1200, &[]);
    let outcome = reconciler(&store).reconcile(&event, "webhook").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Unresolvable);
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn cart_completion_creates_captured_order() {
    let store = Arc::new(MockStore::default());

    let event = succeeded_event("pi_3", 7800, &[("cart_id", "cart_9")]);
    let outcome = reconciler(&store).reconcile(&event, "webhook").await.unwrap();

    let ReconcileOutcome::OrderCreated { order_id, degraded } = outcome else {
        panic!("expected OrderCreated, got {outcome:?}");
    };
    assert!(!degraded);

    let stored = store.order(&order_id).unwrap();
    assert_eq!(stored.metadata.get("payment_captured"), Some(&Value::Bool(true)));
    assert_eq!(
        stored.metadata.get("cart_id").and_then(Value::as_str),
        Some("cart_9")
    );
    assert_eq!(activity_log(&stored).len(), 1);
}

#[tokio::test]
async fn rejected_cart_falls_back_to_synthesized_order() {
    let store = Arc::new(MockStore::new("REJECT_CART"));

    let event = succeeded_event("pi_4", 5000, &[("cart_id", "cart_9")]);
    let outcome = reconciler(&store).reconcile(&event, "webhook").await.unwrap();

    let ReconcileOutcome::OrderCreated { order_id, degraded } = outcome else {
        panic!("expected OrderCreated, got {outcome:?}");
    };
    assert!(degraded);

    let stored = store.order(&order_id).unwrap();
    assert_eq!(stored.total, 5000);
    assert_eq!(stored.currency, "usd");
    assert_eq!(stored.email.as_deref(), Some("customer@example.com"));
    assert_eq!(
        stored.metadata.get("created_from").and_then(Value::as_str),
        Some("fallback")
    );
    assert_eq!(stored.metadata.get("payment_captured"), Some(&Value::Bool(true)));
}

#[tokio::test]
async fn existing_cart_order_is_updated_not_duplicated() {
    let store = Arc::new(MockStore::default());
    let mut tagged = open_order("order_77");
    tagged.metadata.insert(
        "cart_id".to_string(),
        Value::String("cart_9".to_string()),
    );
    store.seed(tagged);

    let event = succeeded_event("pi_5", 5000, &[("cart_id", "cart_9")]);
    let outcome = reconciler(&store).reconcile(&event, "poller").await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::OrderUpdated {
            order_id: "order_77".to_string()
        }
    );
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn missing_order_with_no_cart_is_unresolvable() {
    let store = Arc::new(MockStore::default());

    let event = succeeded_event("pi_6", 5000, &[("order_id", "order_404")]);
    let outcome = reconciler(&store).reconcile(&event, "webhook").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Unresolvable);
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn store_write_failure_is_surfaced() {
    let store = Arc::new(MockStore::default());
    store.seed(open_order("order_42"));
    store.fail_updates_for("order_42");

    let event = succeeded_event("pi_7", 5000, &[("order_id", "order_42")]);
    let err = reconciler(&store)
        .reconcile(&event, "webhook")
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Store(_)));
    let stored = store.order("order_42").unwrap();
    assert!(!stored.payment_captured());
}
