use crate::domain::event::PaymentEvent;
use anyhow::Result;

pub mod mock;
pub mod stripe;

#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn retrieve_payment(&self, payment_intent_id: &str) -> Result<PaymentEvent>;

    async fn list_recent_payments(&self, created_after: i64, limit: i64) -> Result<Vec<PaymentEvent>>;

    async fn ping(&self) -> Result<()>;
}
