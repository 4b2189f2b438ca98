use crate::domain::confirm::{ConfirmError, Confirmation};
use crate::domain::event::{PaymentEventStatus, ORDER_ID_META};
use crate::domain::order;
use crate::domain::outcome::ReconcileError;
use crate::provider::PaymentProvider;
use crate::store::OrderStore;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConfirmationService {
    pub provider: Arc<dyn PaymentProvider>,
    pub store: Arc<dyn OrderStore>,
}

impl ConfirmationService {
    // The client's claim of success is never trusted: the payment status is
    // re-read from the provider before any order is touched. This path only
    // confirms orders that checkout completion already created; it never
    // synthesizes one.
    pub async fn confirm(
        &self,
        payment_intent_id: &str,
        explicit_order_id: Option<&str>,
    ) -> Result<Confirmation, ConfirmError> {
        let event = self
            .provider
            .retrieve_payment(payment_intent_id)
            .await
            .map_err(|e| {
                ReconcileError::Provider(
                    e.context(format!("re-verifying payment {payment_intent_id}")),
                )
            })?;

        if event.status != PaymentEventStatus::Succeeded {
            return Err(ConfirmError::InvalidState {
                payment_intent_id: payment_intent_id.to_string(),
                status: event.status.as_str().to_string(),
            });
        }

        let order_id = explicit_order_id
            .map(str::to_string)
            .or_else(|| event.metadata.get(ORDER_ID_META).cloned())
            .ok_or_else(|| ConfirmError::Unresolvable {
                payment_intent_id: payment_intent_id.to_string(),
            })?;

        let order = self
            .store
            .find_order(&order_id)
            .await
            .map_err(|e| {
                ReconcileError::Store(e.context(format!(
                    "looking up order {order_id} for payment {payment_intent_id}"
                )))
            })?
            .ok_or_else(|| ConfirmError::Unresolvable {
                payment_intent_id: payment_intent_id.to_string(),
            })?;

        if order.payment_captured() {
            let confirmed_at = order.confirmed_at();
            return Ok(Confirmation {
                success: true,
                order_id: order.id,
                status: "already_confirmed".to_string(),
                amount_minor: event.amount_minor,
                currency: event.currency,
                receipt_url: event.receipt_url,
                confirmed_at,
            });
        }

        let now = Utc::now();
        let merged = order::merge_capture(&order.metadata, &event, "confirmation", now);
        let updated = self
            .store
            .update_order_metadata(&order.id, merged)
            .await
            .map_err(|e| {
                ReconcileError::Store(e.context(format!(
                    "stamping order {} for payment {payment_intent_id}",
                    order.id
                )))
            })?;

        tracing::info!(
            payment_intent_id = %payment_intent_id,
            order_id = %updated.id,
            "payment confirmed against order"
        );

        Ok(Confirmation {
            success: true,
            order_id: updated.id,
            status: "captured".to_string(),
            amount_minor: event.amount_minor,
            currency: event.currency,
            receipt_url: event.receipt_url,
            confirmed_at: Some(now.to_rfc3339()),
        })
    }
}
