use crate::domain::outcome::{ErrorEnvelope, ReconcileError};
use crate::service::poller::SingleOutcome;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReconcilePaymentRequest {
    pub payment_intent_id: String,
}

pub async fn reconcile_pending(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> impl IntoResponse {
    match state.poller.run_bulk(query.hours).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            tracing::error!("bulk reconcile failed: {err}");
            let (status, code) = backend_response(&err);
            (status, Json(ErrorEnvelope::new(code, err.to_string()))).into_response()
        }
    }
}

pub async fn reconcile_payment(
    State(state): State<AppState>,
    Json(req): Json<ReconcilePaymentRequest>,
) -> impl IntoResponse {
    match state.poller.run_single(&req.payment_intent_id).await {
        Ok(SingleOutcome::Reconciled(outcome)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "payment_intent_id": req.payment_intent_id,
                "outcome": outcome,
            })),
        )
            .into_response(),
        Ok(SingleOutcome::NotSucceeded { status }) => (
            StatusCode::CONFLICT,
            Json(ErrorEnvelope::new(
                "INVALID_STATE",
                format!(
                    "payment {} is not in a succeeded state ({})",
                    req.payment_intent_id,
                    status.as_str()
                ),
            )),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(
                payment_intent_id = %req.payment_intent_id,
                "manual reconcile failed: {err}"
            );
            let (status, code) = backend_response(&err);
            (status, Json(ErrorEnvelope::new(code, err.to_string()))).into_response()
        }
    }
}

fn backend_response(err: &ReconcileError) -> (StatusCode, &'static str) {
    match err {
        ReconcileError::Provider(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE"),
        ReconcileError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ORDER_STORE_FAILURE"),
    }
}
