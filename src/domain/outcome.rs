use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    AlreadyReconciled { order_id: String },
    OrderUpdated { order_id: String },
    OrderCreated { order_id: String, degraded: bool },
    Unresolvable,
}

impl ReconcileOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::AlreadyReconciled { .. } => "already_reconciled",
            ReconcileOutcome::OrderUpdated { .. } => "order_updated",
            ReconcileOutcome::OrderCreated { degraded: false, .. } => "order_created",
            ReconcileOutcome::OrderCreated { degraded: true, .. } => "order_created_fallback",
            ReconcileOutcome::Unresolvable => "unresolvable",
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            ReconcileOutcome::AlreadyReconciled { order_id }
            | ReconcileOutcome::OrderUpdated { order_id }
            | ReconcileOutcome::OrderCreated { order_id, .. } => Some(order_id),
            ReconcileOutcome::Unresolvable => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("payment provider request failed: {0:#}")]
    Provider(anyhow::Error),
    #[error("order store request failed: {0:#}")]
    Store(anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct PollSummary {
    pub checked: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub orders: Vec<EventReport>,
}

#[derive(Debug, Serialize)]
pub struct EventReport {
    pub payment_intent_id: String,
    pub outcome: String,
    pub order_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorPayload {
                code: code.to_string(),
                message: message.into(),
                details: None,
            },
        }
    }
}
