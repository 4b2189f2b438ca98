use crate::domain::event::CART_ID_META;
use crate::domain::order::Order;
use crate::store::{CartCompletion, NewFallbackOrder, OrderStore};
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockStore {
    pub behavior: String,
    orders: Mutex<HashMap<String, Order>>,
    failing_updates: Mutex<HashSet<String>>,
}

impl MockStore {
    pub fn new(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            ..Self::default()
        }
    }

    pub fn seed(&self, order: Order) {
        self.lock_orders().insert(order.id.clone(), order);
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.lock_orders().get(order_id).cloned()
    }

    pub fn order_count(&self) -> usize {
        self.lock_orders().len()
    }

    pub fn fail_updates_for(&self, order_id: &str) {
        self.failing_updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(order_id.to_string());
    }

    fn lock_orders(&self) -> std::sync::MutexGuard<'_, HashMap<String, Order>> {
        self.orders.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl OrderStore for MockStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn find_order(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self.lock_orders().get(order_id).cloned())
    }

    async fn find_order_by_cart(&self, cart_id: &str) -> Result<Option<Order>> {
        Ok(self
            .lock_orders()
            .values()
            .find(|order| {
                order.metadata.get(CART_ID_META).and_then(Value::as_str) == Some(cart_id)
            })
            .cloned())
    }

    async fn update_order_metadata(&self, order_id: &str, metadata: Map<String, Value>) -> Result<Order> {
        if self
            .failing_updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(order_id)
        {
            return Err(anyhow!("mock write failure for order {order_id}"));
        }

        let mut orders = self.lock_orders();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| anyhow!("order {order_id} not found"))?;
        order.metadata = metadata;
        Ok(order.clone())
    }

    async fn complete_cart(&self, cart_id: &str) -> Result<CartCompletion> {
        match self.behavior.as_str() {
            "REJECT_CART" => Ok(CartCompletion::Rejected {
                reason: "cart has expired".to_string(),
            }),
            "FAIL_CART" => Err(anyhow!("mock store unavailable")),
            _ => {
                let mut metadata = Map::new();
                metadata.insert(CART_ID_META.to_string(), Value::String(cart_id.to_string()));
                let order = Order {
                    id: format!("order_{}", Uuid::new_v4().simple()),
                    email: None,
                    total: 0,
                    currency: "usd".to_string(),
                    metadata,
                };
                self.lock_orders().insert(order.id.clone(), order.clone());
                Ok(CartCompletion::Completed(order))
            }
        }
    }

    async fn create_fallback_order(&self, input: NewFallbackOrder) -> Result<Order> {
        let order = Order {
            id: format!("order_{}", Uuid::new_v4().simple()),
            email: input.email,
            total: input.total,
            currency: input.currency,
            metadata: input.metadata,
        };
        self.lock_orders().insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
