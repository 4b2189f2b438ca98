use crate::domain::confirm::{ConfirmError, ConfirmPaymentRequest};
use crate::domain::outcome::{ErrorEnvelope, ReconcileError};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> impl IntoResponse {
    match state
        .confirmation
        .confirm(&req.payment_intent_id, req.order_id.as_deref())
        .await
    {
        Ok(confirmation) => (StatusCode::OK, Json(confirmation)).into_response(),
        Err(err) => {
            let (status, code) = match &err {
                ConfirmError::InvalidState { .. } => (StatusCode::CONFLICT, "INVALID_STATE"),
                ConfirmError::Unresolvable { .. } => (StatusCode::NOT_FOUND, "UNRESOLVABLE"),
                ConfirmError::Backend(ReconcileError::Provider(_)) => {
                    (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE")
                }
                ConfirmError::Backend(ReconcileError::Store(_)) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "ORDER_STORE_FAILURE")
                }
            };
            tracing::warn!(
                payment_intent_id = %req.payment_intent_id,
                "payment confirmation failed: {err}"
            );
            (status, Json(ErrorEnvelope::new(code, err.to_string()))).into_response()
        }
    }
}
