use std::collections::HashMap;

pub const ORDER_ID_META: &str = "order_id";
pub const CART_ID_META: &str = "cart_id";

#[derive(Debug, Clone)]
pub struct PaymentEvent {
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentEventStatus,
    pub metadata: HashMap<String, String>,
    pub receipt_url: Option<String>,
    pub customer_email: Option<String>,
    pub created: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEventStatus {
    Succeeded,
    Pending,
    Canceled,
    Failed,
}

impl PaymentEventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentEventStatus::Succeeded => "succeeded",
            PaymentEventStatus::Pending => "pending",
            PaymentEventStatus::Canceled => "canceled",
            PaymentEventStatus::Failed => "failed",
        }
    }
}
