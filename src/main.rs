use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use order_reconciler::config::AppConfig;
use order_reconciler::provider::stripe::StripeProvider;
use order_reconciler::provider::PaymentProvider;
use order_reconciler::service::confirmation::ConfirmationService;
use order_reconciler::service::poller::Poller;
use order_reconciler::service::reconciler::Reconciler;
use order_reconciler::store::medusa::MedusaStore;
use order_reconciler::store::OrderStore;
use order_reconciler::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let provider: Arc<dyn PaymentProvider> = Arc::new(StripeProvider {
        base_url: cfg.stripe_base_url.clone(),
        secret_key: cfg.stripe_secret_key.clone(),
        timeout_ms: cfg.provider_timeout_ms,
        client: reqwest::Client::new(),
    });
    let store: Arc<dyn OrderStore> = Arc::new(MedusaStore {
        base_url: cfg.medusa_base_url.clone(),
        api_token: cfg.medusa_api_token.clone(),
        timeout_ms: cfg.store_timeout_ms,
        client: reqwest::Client::new(),
    });

    let reconciler = Reconciler {
        store: store.clone(),
    };
    let poller = Poller {
        provider: provider.clone(),
        reconciler: reconciler.clone(),
        lookback_hours: cfg.poll_lookback_hours,
        page_limit: cfg.poll_page_limit,
    };
    let confirmation = ConfirmationService {
        provider: provider.clone(),
        store: store.clone(),
    };

    let state = AppState {
        reconciler,
        poller,
        confirmation,
        provider,
        store,
        webhook_secret: cfg.stripe_webhook_secret.clone(),
    };

    let admin_routes = Router::new()
        .route(
            "/reconcile/pending",
            get(order_reconciler::http::handlers::reconcile::reconcile_pending),
        )
        .route(
            "/reconcile/payment",
            post(order_reconciler::http::handlers::reconcile::reconcile_payment),
        )
        .layer(from_fn_with_state(
            cfg.internal_api_key.clone(),
            order_reconciler::http::middleware::admin_auth::require_internal_api_key,
        ));

    let app = Router::new()
        .route(
            "/webhooks/payments",
            post(order_reconciler::http::handlers::webhooks::receive_payment_webhook),
        )
        .route(
            "/payments/confirm",
            post(order_reconciler::http::handlers::confirm::confirm_payment),
        )
        .route("/ops/liveness", get(order_reconciler::http::handlers::ops::liveness))
        .route("/ops/readiness", get(order_reconciler::http::handlers::ops::readiness))
        .merge(admin_routes)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
