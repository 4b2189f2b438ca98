use crate::domain::outcome::ReconcileError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub success: bool,
    pub order_id: String,
    pub status: String,
    pub amount_minor: i64,
    pub currency: String,
    pub receipt_url: Option<String>,
    pub confirmed_at: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("payment {payment_intent_id} is not in a confirmable state ({status})")]
    InvalidState {
        payment_intent_id: String,
        status: String,
    },
    #[error("no order could be resolved for payment {payment_intent_id}")]
    Unresolvable { payment_intent_id: String },
    #[error(transparent)]
    Backend(#[from] ReconcileError),
}
