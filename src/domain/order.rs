use crate::domain::event::PaymentEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CAPTURED_META: &str = "payment_captured";
pub const CONFIRMED_AT_META: &str = "payment_confirmed_at";
pub const ACTIVITY_LOG_META: &str = "activity_log";
pub const CREATED_FROM_META: &str = "created_from";

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub email: Option<String>,
    pub total: i64,
    pub currency: String,
    pub metadata: Map<String, Value>,
}

impl Order {
    pub fn payment_captured(&self) -> bool {
        self.metadata
            .get(CAPTURED_META)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn confirmed_at(&self) -> Option<String> {
        self.metadata
            .get(CONFIRMED_AT_META)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: String,
    pub status: String,
}

// Read-modify-write merge: prior metadata keys and activity_log entries are
// preserved, never replaced. The worst a lost concurrent merge produces is a
// duplicated log entry, not a dropped one.
pub fn merge_capture(
    metadata: &Map<String, Value>,
    event: &PaymentEvent,
    via: &str,
    now: DateTime<Utc>,
) -> Map<String, Value> {
    let mut merged = metadata.clone();
    merged.insert(CAPTURED_META.to_string(), Value::Bool(true));
    merged.insert("payment_status".to_string(), Value::String("captured".to_string()));
    merged.insert("payment_intent_id".to_string(), Value::String(event.id.clone()));
    merged.insert(CONFIRMED_AT_META.to_string(), Value::String(now.to_rfc3339()));
    if let Some(url) = &event.receipt_url {
        merged.insert("receipt_url".to_string(), Value::String(url.clone()));
    }

    let mut log = metadata
        .get(ACTIVITY_LOG_META)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let entry = ActivityEntry {
        timestamp: now,
        action: "payment_confirmed".to_string(),
        details: format!("{} {} via {}", event.amount_minor, event.currency, via),
        status: "captured".to_string(),
    };
    log.push(serde_json::to_value(entry).unwrap_or(Value::Null));
    merged.insert(ACTIVITY_LOG_META.to_string(), Value::Array(log));

    merged
}
