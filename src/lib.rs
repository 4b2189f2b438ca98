pub mod config;
pub mod domain {
    pub mod confirm;
    pub mod event;
    pub mod order;
    pub mod outcome;
}
pub mod provider;
pub mod store;
pub mod webhook;
pub mod http {
    pub mod handlers {
        pub mod confirm;
        pub mod ops;
        pub mod reconcile;
        pub mod webhooks;
    }
    pub mod middleware {
        pub mod admin_auth;
    }
}
pub mod service {
    pub mod confirmation;
    pub mod poller;
    pub mod reconciler;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub reconciler: service::reconciler::Reconciler,
    pub poller: service::poller::Poller,
    pub confirmation: service::confirmation::ConfirmationService,
    pub provider: Arc<dyn provider::PaymentProvider>,
    pub store: Arc<dyn store::OrderStore>,
    pub webhook_secret: String,
}
