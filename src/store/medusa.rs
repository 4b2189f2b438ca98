use crate::domain::order::Order;
use crate::store::{CartCompletion, NewFallbackOrder, OrderStore};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub struct MedusaStore {
    pub base_url: String,
    pub api_token: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: MedusaOrder,
}

#[derive(Debug, Deserialize)]
struct OrderListEnvelope {
    #[serde(default)]
    orders: Vec<MedusaOrder>,
}

#[derive(Debug, Deserialize)]
struct MedusaOrder {
    id: String,
    email: Option<String>,
    #[serde(default)]
    total: i64,
    currency_code: String,
    #[serde(default)]
    metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CartCompletionEnvelope {
    #[serde(rename = "type")]
    kind: String,
    data: Option<MedusaOrder>,
}

impl From<MedusaOrder> for Order {
    fn from(raw: MedusaOrder) -> Self {
        Order {
            id: raw.id,
            email: raw.email,
            total: raw.total,
            currency: raw.currency_code,
            metadata: raw.metadata,
        }
    }
}

impl MedusaStore {
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[async_trait::async_trait]
impl OrderStore for MedusaStore {
    fn name(&self) -> &'static str {
        "medusa"
    }

    async fn find_order(&self, order_id: &str) -> Result<Option<Order>> {
        let url = format!("{}/admin/orders/{}", self.base_url, order_id);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout())
            .send()
            .await
            .with_context(|| format!("looking up order {order_id}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "order store returned {} for order {}: {}",
                status,
                order_id,
                snippet(&body)
            ));
        }

        let envelope: OrderEnvelope = resp
            .json()
            .await
            .with_context(|| format!("decoding order {order_id}"))?;
        Ok(Some(envelope.order.into()))
    }

    async fn find_order_by_cart(&self, cart_id: &str) -> Result<Option<Order>> {
        let url = format!("{}/admin/orders", self.base_url);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(&[("cart_id", cart_id), ("limit", "1")])
            .timeout(self.timeout())
            .send()
            .await
            .with_context(|| format!("looking up order for cart {cart_id}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "order store returned {} listing orders for cart {}: {}",
                status,
                cart_id,
                snippet(&body)
            ));
        }

        let envelope: OrderListEnvelope = resp
            .json()
            .await
            .with_context(|| format!("decoding order listing for cart {cart_id}"))?;
        Ok(envelope.orders.into_iter().next().map(Into::into))
    }

    async fn update_order_metadata(&self, order_id: &str, metadata: Map<String, Value>) -> Result<Order> {
        let url = format!("{}/admin/orders/{}", self.base_url, order_id);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "metadata": metadata }))
            .timeout(self.timeout())
            .send()
            .await
            .with_context(|| format!("updating order {order_id}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "order store returned {} updating order {}: {}",
                status,
                order_id,
                snippet(&body)
            ));
        }

        let envelope: OrderEnvelope = resp
            .json()
            .await
            .with_context(|| format!("decoding updated order {order_id}"))?;
        Ok(envelope.order.into())
    }

    async fn complete_cart(&self, cart_id: &str) -> Result<CartCompletion> {
        let url = format!("{}/store/carts/{}/complete", self.base_url, cart_id);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout())
            .send()
            .await
            .with_context(|| format!("completing cart {cart_id}"))?;

        let status = resp.status();
        if status.is_success() {
            let envelope: CartCompletionEnvelope = resp
                .json()
                .await
                .with_context(|| format!("decoding completion of cart {cart_id}"))?;
            return match (envelope.kind.as_str(), envelope.data) {
                ("order", Some(order)) => Ok(CartCompletion::Completed(order.into())),
                (kind, _) => Ok(CartCompletion::Rejected {
                    reason: format!("cart completion returned type {kind}"),
                }),
            };
        }

        let body = resp.text().await.unwrap_or_default();
        if status.is_client_error() {
            return Ok(CartCompletion::Rejected {
                reason: format!("{}: {}", status, snippet(&body)),
            });
        }
        Err(anyhow!(
            "order store returned {} completing cart {}: {}",
            status,
            cart_id,
            snippet(&body)
        ))
    }

    async fn create_fallback_order(&self, input: NewFallbackOrder) -> Result<Order> {
        let url = format!("{}/admin/orders", self.base_url);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&json!({
                "email": input.email,
                "currency_code": input.currency,
                "total": input.total,
                "metadata": input.metadata,
            }))
            .timeout(self.timeout())
            .send()
            .await
            .context("creating fallback order")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "order store returned {} creating fallback order: {}",
                status,
                snippet(&body)
            ));
        }

        let envelope: OrderEnvelope = resp.json().await.context("decoding fallback order")?;
        Ok(envelope.order.into())
    }

    async fn ping(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout())
            .send()
            .await
            .context("order store unreachable")?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(anyhow!("order store returned {}", resp.status()))
        }
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
