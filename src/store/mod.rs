use crate::domain::order::Order;
use anyhow::Result;
use serde_json::{Map, Value};

pub mod medusa;
pub mod mock;

// Completion of a cart is the one store call where "the backend said no" and
// "the backend is down" demand different handling: a rejection proceeds to
// the fallback-order path, an error aborts the attempt.
#[derive(Debug, Clone)]
pub enum CartCompletion {
    Completed(Order),
    Rejected { reason: String },
}

#[derive(Debug, Clone)]
pub struct NewFallbackOrder {
    pub email: Option<String>,
    pub total: i64,
    pub currency: String,
    pub metadata: Map<String, Value>,
}

#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn find_order(&self, order_id: &str) -> Result<Option<Order>>;

    async fn find_order_by_cart(&self, cart_id: &str) -> Result<Option<Order>>;

    async fn update_order_metadata(&self, order_id: &str, metadata: Map<String, Value>) -> Result<Order>;

    async fn complete_cart(&self, cart_id: &str) -> Result<CartCompletion>;

    async fn create_fallback_order(&self, input: NewFallbackOrder) -> Result<Order>;

    async fn ping(&self) -> Result<()>;
}
