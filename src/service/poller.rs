use crate::domain::event::PaymentEventStatus;
use crate::domain::outcome::{EventReport, PollSummary, ReconcileError, ReconcileOutcome};
use crate::provider::PaymentProvider;
use crate::service::reconciler::Reconciler;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct Poller {
    pub provider: Arc<dyn PaymentProvider>,
    pub reconciler: Reconciler,
    pub lookback_hours: i64,
    pub page_limit: i64,
}

#[derive(Debug)]
pub enum SingleOutcome {
    NotSucceeded { status: PaymentEventStatus },
    Reconciled(ReconcileOutcome),
}

impl Poller {
    pub async fn run_bulk(&self, lookback_hours: Option<i64>) -> Result<PollSummary, ReconcileError> {
        let hours = lookback_hours.unwrap_or(self.lookback_hours);
        let cutoff = Utc::now().timestamp() - hours * 3600;

        let events = self
            .provider
            .list_recent_payments(cutoff, self.page_limit)
            .await
            .map_err(|e| ReconcileError::Provider(e.context("listing recent payments")))?;

        let mut summary = PollSummary {
            checked: events.len(),
            processed: 0,
            skipped: 0,
            failed: 0,
            orders: Vec::new(),
        };

        for event in &events {
            if event.status != PaymentEventStatus::Succeeded {
                summary.skipped += 1;
                continue;
            }

            match self.reconciler.reconcile(event, "poller").await {
                Ok(outcome) => {
                    match outcome {
                        ReconcileOutcome::OrderUpdated { .. }
                        | ReconcileOutcome::OrderCreated { .. } => summary.processed += 1,
                        ReconcileOutcome::AlreadyReconciled { .. }
                        | ReconcileOutcome::Unresolvable => summary.skipped += 1,
                    }
                    summary.orders.push(EventReport {
                        payment_intent_id: event.id.clone(),
                        outcome: outcome.label().to_string(),
                        order_id: outcome.order_id().map(str::to_string),
                        error: None,
                    });
                }
                // One event failing must not stop the rest of the batch.
                Err(err) => {
                    summary.failed += 1;
                    tracing::error!(
                        payment_intent_id = %event.id,
                        "reconciliation failed, continuing batch: {err}"
                    );
                    summary.orders.push(EventReport {
                        payment_intent_id: event.id.clone(),
                        outcome: "failed".to_string(),
                        order_id: None,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        Ok(summary)
    }

    pub async fn run_single(&self, payment_intent_id: &str) -> Result<SingleOutcome, ReconcileError> {
        let event = self
            .provider
            .retrieve_payment(payment_intent_id)
            .await
            .map_err(|e| {
                ReconcileError::Provider(e.context(format!("retrieving payment {payment_intent_id}")))
            })?;

        if event.status != PaymentEventStatus::Succeeded {
            tracing::warn!(
                payment_intent_id = %event.id,
                status = event.status.as_str(),
                "manual reconcile rejected, payment has not succeeded"
            );
            return Ok(SingleOutcome::NotSucceeded { status: event.status });
        }

        let outcome = self.reconciler.reconcile(&event, "manual").await?;
        Ok(SingleOutcome::Reconciled(outcome))
    }
}
