use crate::domain::event::{PaymentEvent, CART_ID_META, ORDER_ID_META};
use crate::domain::order::{self, Order, CREATED_FROM_META};
use crate::domain::outcome::{ReconcileError, ReconcileOutcome};
use crate::store::{CartCompletion, NewFallbackOrder, OrderStore};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct Reconciler {
    pub store: Arc<dyn OrderStore>,
}

impl Reconciler {
    // Callers must filter for succeeded events before invoking. Safe to call
    // repeatedly for one event: the captured check runs before any mutation.
    pub async fn reconcile(
        &self,
        event: &PaymentEvent,
        via: &str,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let order_ref = event.metadata.get(ORDER_ID_META);
        let cart_ref = event.metadata.get(CART_ID_META);

        if order_ref.is_none() && cart_ref.is_none() {
            tracing::warn!(
                payment_intent_id = %event.id,
                "payment event carries no order or cart reference"
            );
            return Ok(ReconcileOutcome::Unresolvable);
        }

        if let Some(order) = self.locate_order(event, order_ref, cart_ref).await? {
            if order.payment_captured() {
                tracing::debug!(
                    payment_intent_id = %event.id,
                    order_id = %order.id,
                    "order already captured, nothing to do"
                );
                return Ok(ReconcileOutcome::AlreadyReconciled { order_id: order.id });
            }

            let merged = order::merge_capture(&order.metadata, event, via, Utc::now());
            let updated = self
                .store
                .update_order_metadata(&order.id, merged)
                .await
                .map_err(|e| {
                    ReconcileError::Store(
                        e.context(format!("stamping order {} for payment {}", order.id, event.id)),
                    )
                })?;
            tracing::info!(
                payment_intent_id = %event.id,
                order_id = %updated.id,
                "order marked captured"
            );
            return Ok(ReconcileOutcome::OrderUpdated { order_id: updated.id });
        }

        match cart_ref {
            Some(cart_id) => self.create_from_cart(event, cart_id, via).await,
            None => {
                tracing::warn!(
                    payment_intent_id = %event.id,
                    order_id = ?order_ref,
                    "referenced order does not exist and no cart is available to complete"
                );
                Ok(ReconcileOutcome::Unresolvable)
            }
        }
    }

    async fn locate_order(
        &self,
        event: &PaymentEvent,
        order_ref: Option<&String>,
        cart_ref: Option<&String>,
    ) -> Result<Option<Order>, ReconcileError> {
        if let Some(order_id) = order_ref {
            let direct = self.store.find_order(order_id).await.map_err(|e| {
                ReconcileError::Store(
                    e.context(format!("looking up order {order_id} for payment {}", event.id)),
                )
            })?;
            if direct.is_some() {
                return Ok(direct);
            }
        }

        if let Some(cart_id) = cart_ref {
            return self.store.find_order_by_cart(cart_id).await.map_err(|e| {
                ReconcileError::Store(e.context(format!(
                    "looking up order for cart {cart_id} (payment {})",
                    event.id
                )))
            });
        }

        Ok(None)
    }

    async fn create_from_cart(
        &self,
        event: &PaymentEvent,
        cart_id: &str,
        via: &str,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let completion = self.store.complete_cart(cart_id).await.map_err(|e| {
            ReconcileError::Store(
                e.context(format!("completing cart {cart_id} for payment {}", event.id)),
            )
        })?;

        match completion {
            CartCompletion::Completed(order) => {
                if order.payment_captured() {
                    return Ok(ReconcileOutcome::AlreadyReconciled { order_id: order.id });
                }
                let merged = order::merge_capture(&order.metadata, event, via, Utc::now());
                let updated = self
                    .store
                    .update_order_metadata(&order.id, merged)
                    .await
                    .map_err(|e| {
                        ReconcileError::Store(e.context(format!(
                            "stamping completed order {} for payment {}",
                            order.id, event.id
                        )))
                    })?;
                tracing::info!(
                    payment_intent_id = %event.id,
                    order_id = %updated.id,
                    cart_id = %cart_id,
                    "cart completed into captured order"
                );
                Ok(ReconcileOutcome::OrderCreated {
                    order_id: updated.id,
                    degraded: false,
                })
            }
            CartCompletion::Rejected { reason } => {
                tracing::warn!(
                    payment_intent_id = %event.id,
                    cart_id = %cart_id,
                    reason = %reason,
                    "cart completion rejected, synthesizing fallback order"
                );
                let mut seed = Map::new();
                seed.insert(CREATED_FROM_META.to_string(), Value::String("fallback".to_string()));
                seed.insert(CART_ID_META.to_string(), Value::String(cart_id.to_string()));
                let metadata = order::merge_capture(&seed, event, via, Utc::now());

                let order = self
                    .store
                    .create_fallback_order(NewFallbackOrder {
                        email: event.customer_email.clone(),
                        total: event.amount_minor,
                        currency: event.currency.clone(),
                        metadata,
                    })
                    .await
                    .map_err(|e| {
                        ReconcileError::Store(e.context(format!(
                            "synthesizing fallback order for cart {cart_id} (payment {})",
                            event.id
                        )))
                    })?;
                tracing::info!(
                    payment_intent_id = %event.id,
                    order_id = %order.id,
                    "fallback order synthesized from payment event"
                );
                Ok(ReconcileOutcome::OrderCreated {
                    order_id: order.id,
                    degraded: true,
                })
            }
        }
    }
}
