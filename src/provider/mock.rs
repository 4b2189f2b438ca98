use crate::domain::event::{PaymentEvent, PaymentEventStatus};
use crate::provider::PaymentProvider;
use anyhow::{anyhow, Result};

#[derive(Default)]
pub struct MockProvider {
    pub behavior: String,
    pub events: Vec<PaymentEvent>,
}

impl MockProvider {
    pub fn new(events: Vec<PaymentEvent>) -> Self {
        Self {
            behavior: String::new(),
            events,
        }
    }

    pub fn with_behavior(events: Vec<PaymentEvent>, behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            events,
        }
    }
}

#[async_trait::async_trait]
impl PaymentProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn retrieve_payment(&self, payment_intent_id: &str) -> Result<PaymentEvent> {
        if self.behavior == "ALWAYS_UNAVAILABLE" {
            return Err(anyhow!("mock provider unreachable"));
        }

        self.events
            .iter()
            .find(|event| event.id == payment_intent_id)
            .cloned()
            .ok_or_else(|| anyhow!("mock provider has no payment {payment_intent_id}"))
    }

    async fn list_recent_payments(&self, created_after: i64, limit: i64) -> Result<Vec<PaymentEvent>> {
        if self.behavior == "ALWAYS_UNAVAILABLE" {
            return Err(anyhow!("mock provider unreachable"));
        }

        Ok(self
            .events
            .iter()
            .filter(|event| event.created >= created_after)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        if self.behavior == "ALWAYS_UNAVAILABLE" {
            return Err(anyhow!("mock provider unreachable"));
        }
        Ok(())
    }
}

pub fn succeeded_event(id: &str, amount_minor: i64, metadata: &[(&str, &str)]) -> PaymentEvent {
    PaymentEvent {
        id: id.to_string(),
        amount_minor,
        currency: "usd".to_string(),
        status: PaymentEventStatus::Succeeded,
        metadata: metadata
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        receipt_url: None,
        customer_email: Some("customer@example.com".to_string()),
        created: chrono::Utc::now().timestamp(),
    }
}
