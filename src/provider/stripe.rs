use crate::domain::event::{PaymentEvent, PaymentEventStatus};
use crate::provider::PaymentProvider;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

pub struct StripeProvider {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntentPayload {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub receipt_email: Option<String>,
    #[serde(default)]
    pub created: i64,
    pub charges: Option<ChargeList>,
}

#[derive(Debug, Deserialize)]
pub struct ChargeList {
    #[serde(default)]
    pub data: Vec<ChargePayload>,
}

#[derive(Debug, Deserialize)]
pub struct ChargePayload {
    pub receipt_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentList {
    #[serde(default)]
    data: Vec<PaymentIntentPayload>,
}

impl PaymentIntentPayload {
    pub fn into_event(self) -> PaymentEvent {
        let receipt_url = self
            .charges
            .and_then(|charges| charges.data.into_iter().find_map(|charge| charge.receipt_url));

        PaymentEvent {
            id: self.id,
            amount_minor: self.amount,
            currency: self.currency,
            status: status_from_wire(&self.status),
            metadata: self.metadata,
            receipt_url,
            customer_email: self.receipt_email,
            created: self.created,
        }
    }
}

fn status_from_wire(status: &str) -> PaymentEventStatus {
    match status {
        "succeeded" => PaymentEventStatus::Succeeded,
        "canceled" => PaymentEventStatus::Canceled,
        "failed" => PaymentEventStatus::Failed,
        "processing" | "requires_action" | "requires_capture" | "requires_confirmation"
        | "requires_payment_method" => PaymentEventStatus::Pending,
        other => {
            tracing::warn!("unknown payment status {other:?}, treating as pending");
            PaymentEventStatus::Pending
        }
    }
}

#[async_trait::async_trait]
impl PaymentProvider for StripeProvider {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn retrieve_payment(&self, payment_intent_id: &str) -> Result<PaymentEvent> {
        let url = format!("{}/v1/payment_intents/{}", self.base_url, payment_intent_id);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let payload: PaymentIntentPayload = r
                    .json()
                    .await
                    .with_context(|| format!("decoding payment intent {payment_intent_id}"))?;
                Ok(payload.into_event())
            }
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                Err(anyhow!(
                    "payment provider returned {} for {}: {}",
                    status,
                    payment_intent_id,
                    snippet(&body)
                ))
            }
            Err(e) if e.is_timeout() => Err(anyhow!(
                "payment provider timed out retrieving {payment_intent_id}"
            )),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("retrieving payment {payment_intent_id}"))),
        }
    }

    async fn list_recent_payments(&self, created_after: i64, limit: i64) -> Result<Vec<PaymentEvent>> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .query(&[
                ("limit", limit.to_string()),
                ("created[gte]", created_after.to_string()),
            ])
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let list: PaymentIntentList =
                    r.json().await.context("decoding payment intent listing")?;
                Ok(list.data.into_iter().map(PaymentIntentPayload::into_event).collect())
            }
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                Err(anyhow!(
                    "payment provider returned {} listing payments: {}",
                    status,
                    snippet(&body)
                ))
            }
            Err(e) if e.is_timeout() => Err(anyhow!("payment provider timed out listing payments")),
            Err(e) => Err(anyhow::Error::new(e).context("listing recent payments")),
        }
    }

    async fn ping(&self) -> Result<()> {
        let url = format!("{}/v1/balance", self.base_url);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .context("payment provider unreachable")?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(anyhow!("payment provider returned {}", resp.status()))
        }
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
