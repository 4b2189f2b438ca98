use anyhow::Result;
use order_reconciler::config::AppConfig;
use order_reconciler::provider::stripe::StripeProvider;
use order_reconciler::provider::PaymentProvider;
use order_reconciler::service::poller::Poller;
use order_reconciler::service::reconciler::Reconciler;
use order_reconciler::store::medusa::MedusaStore;
use order_reconciler::store::OrderStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
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

    let poller = Poller {
        provider,
        reconciler: Reconciler { store },
        lookback_hours: cfg.poll_lookback_hours,
        page_limit: cfg.poll_page_limit,
    };

    loop {
        match poller.run_bulk(None).await {
            Ok(summary) => {
                tracing::info!(
                    checked = summary.checked,
                    processed = summary.processed,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "reconcile pass complete"
                );
            }
            Err(err) => {
                tracing::error!("reconcile pass failed: {err}");
            }
        }

        tokio::time::sleep(std::time::Duration::from_secs(cfg.poll_interval_secs)).await;
    }
}
