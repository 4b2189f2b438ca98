use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use order_reconciler::domain::order::Order;
use order_reconciler::provider::mock::{succeeded_event, MockProvider};
use order_reconciler::service::confirmation::ConfirmationService;
use order_reconciler::service::poller::Poller;
use order_reconciler::service::reconciler::Reconciler;
use order_reconciler::store::mock::MockStore;
use order_reconciler::AppState;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

const API_KEY: &str = "test-internal-key";

fn app(provider: Arc<MockProvider>, store: Arc<MockStore>) -> Router {
    let reconciler = Reconciler {
        store: store.clone(),
    };
    let state = AppState {
        reconciler: reconciler.clone(),
        poller: Poller {
            provider: provider.clone(),
            reconciler,
            lookback_hours: 24,
            page_limit: 100,
        },
        confirmation: ConfirmationService {
            provider: provider.clone(),
            store: store.clone(),
        },
        provider,
        store,
        webhook_secret: "whsec_test".to_string(),
    };

    Router::new()
        .route(
            "/reconcile/pending",
            get(order_reconciler::http::handlers::reconcile::reconcile_pending),
        )
        .route(
            "/reconcile/payment",
            post(order_reconciler::http::handlers::reconcile::reconcile_payment),
        )
        .layer(from_fn_with_state(
            API_KEY.to_string(),
            order_reconciler::http::middleware::admin_auth::require_internal_api_key,
        ))
        .with_state(state)
}

fn open_order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        email: None,
        total: 5000,
        currency: "usd".to_string(),
        metadata: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn bulk_trigger_requires_internal_api_key() {
    let provider = Arc::new(MockProvider::new(vec![]));
    let store = Arc::new(MockStore::default());

    let response = app(provider, store)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/reconcile/pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bulk_trigger_reconciles_recent_payments() {
    let store = Arc::new(MockStore::default());
    store.seed(open_order("order_1"));
    let provider = Arc::new(MockProvider::new(vec![succeeded_event(
        "pi_1",
        5000,
        &[("order_id", "order_1")],
    )]));

    let response = app(provider, store.clone())
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/reconcile/pending?hours=6")
                .header("X-Internal-Api-Key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.order("order_1").unwrap().payment_captured());
}

#[tokio::test]
async fn single_trigger_rejects_payment_that_has_not_succeeded() {
    let store = Arc::new(MockStore::default());
    store.seed(open_order("order_1"));

    let mut event = succeeded_event("pi_1", 5000, &[("order_id", "order_1")]);
    event.status = order_reconciler::domain::event::PaymentEventStatus::Pending;
    let provider = Arc::new(MockProvider::new(vec![event]));

    let body = serde_json::to_vec(&json!({"payment_intent_id": "pi_1"})).unwrap();
    let response = app(provider, store.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reconcile/payment")
                .header("content-type", "application/json")
                .header("X-Internal-Api-Key", API_KEY)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(!store.order("order_1").unwrap().payment_captured());
}

#[tokio::test]
async fn single_trigger_reconciles_payment() {
    let store = Arc::new(MockStore::default());
    store.seed(open_order("order_1"));
    let provider = Arc::new(MockProvider::new(vec![succeeded_event(
        "pi_1",
        5000,
        &[("order_id", "order_1")],
    )]));

    let body = serde_json::to_vec(&json!({"payment_intent_id": "pi_1"})).unwrap();
    let response = app(provider, store.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reconcile/payment")
                .header("content-type", "application/json")
                .header("X-Internal-Api-Key", API_KEY)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.order("order_1").unwrap().payment_captured());
}
