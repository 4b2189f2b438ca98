use crate::domain::event::PaymentEventStatus;
use crate::domain::outcome::ErrorEnvelope;
use crate::provider::stripe::PaymentIntentPayload;
use crate::webhook::{self, WebhookEnvelope, PAYMENT_SUCCEEDED_EVENT, SIGNATURE_HEADER};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

pub async fn receive_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|h| h.to_str().ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new(
                "MISSING_SIGNATURE",
                "stripe-signature header is required",
            )),
        )
            .into_response();
    };

    match webhook::verify_signature(&body, signature, &state.webhook_secret) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorEnvelope::new(
                    "INVALID_SIGNATURE",
                    "webhook signature verification failed",
                )),
            )
                .into_response();
        }
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorEnvelope::new("INVALID_SIGNATURE", err.to_string())),
            )
                .into_response();
        }
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorEnvelope::new("MALFORMED_EVENT", err.to_string())),
            )
                .into_response();
        }
    };

    if envelope.event_type != PAYMENT_SUCCEEDED_EVENT {
        tracing::debug!(
            webhook_event_id = %envelope.id,
            event_type = %envelope.event_type,
            "ignoring webhook event type"
        );
        return (
            StatusCode::OK,
            Json(serde_json::json!({
                "received": true,
                "handled": false,
                "event_type": envelope.event_type,
            })),
        )
            .into_response();
    }

    let payload: PaymentIntentPayload = match serde_json::from_value(envelope.data.object) {
        Ok(payload) => payload,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorEnvelope::new("MALFORMED_EVENT", err.to_string())),
            )
                .into_response();
        }
    };
    let event = payload.into_event();

    if event.status != PaymentEventStatus::Succeeded {
        return (
            StatusCode::OK,
            Json(serde_json::json!({
                "received": true,
                "handled": false,
                "status": event.status.as_str(),
            })),
        )
            .into_response();
    }

    match state.reconciler.reconcile(&event, "webhook").await {
        Ok(outcome) => {
            tracing::info!(
                webhook_event_id = %envelope.id,
                payment_intent_id = %event.id,
                outcome = outcome.label(),
                "webhook reconciled"
            );
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "received": true,
                    "handled": true,
                    "outcome": outcome,
                })),
            )
                .into_response()
        }
        // 5xx so the provider redelivers and the poller gets another chance.
        Err(err) => {
            tracing::error!(
                webhook_event_id = %envelope.id,
                payment_intent_id = %event.id,
                "webhook reconciliation failed: {err}"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::new("ORDER_STORE_FAILURE", err.to_string())),
            )
                .into_response()
        }
    }
}
