#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub stripe_base_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub provider_timeout_ms: u64,
    pub medusa_base_url: String,
    pub medusa_api_token: String,
    pub store_timeout_ms: u64,
    pub poll_lookback_hours: i64,
    pub poll_page_limit: i64,
    pub poll_interval_secs: u64,
    pub internal_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            stripe_base_url: std::env::var("STRIPE_BASE_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            provider_timeout_ms: std::env::var("PROVIDER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(5000),
            medusa_base_url: std::env::var("MEDUSA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            medusa_api_token: std::env::var("MEDUSA_API_TOKEN").unwrap_or_default(),
            store_timeout_ms: std::env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(5000),
            poll_lookback_hours: std::env::var("POLL_LOOKBACK_HOURS")
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(24),
            poll_page_limit: std::env::var("POLL_PAGE_LIMIT")
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(100),
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(300),
            internal_api_key: std::env::var("INTERNAL_API_KEY")
                .unwrap_or_else(|_| "dev-internal-key".to_string()),
        }
    }
}
