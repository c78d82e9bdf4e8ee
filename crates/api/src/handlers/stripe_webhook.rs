//! Stripe webhook receiver.
//!
//! The raw body is verified against the `Stripe-Signature` header before it
//! is parsed. Nothing is written when verification fails. Redelivered events
//! are harmless: purchase inserts are keyed by the checkout session id.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use iguana_core::checkout::{classify_event, parse_event, WebhookAction};
use iguana_core::error::CoreError;
use iguana_core::stripe_signature;
use iguana_db::models::order::{ORDER_STATUS_EXPIRED, ORDER_STATUS_FAILED};
use iguana_db::repositories::OrderRepo;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/v1/webhooks/stripe
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;

    let stripe = &state.config.stripe;
    if let Err(err) = stripe_signature::verify(
        &body,
        signature,
        &stripe.webhook_secret,
        Utc::now(),
        stripe.signature_tolerance_secs,
    ) {
        tracing::warn!(error = %err, "Rejected Stripe webhook");
        return Err(AppError::BadRequest(err.to_string()));
    }

    let event = parse_event(&body).map_err(CoreError::from)?;
    let action = classify_event(&event).map_err(|err| {
        tracing::warn!(
            event_id = %event.id,
            event_type = %event.event_type,
            error = %err,
            "Unusable Stripe event",
        );
        CoreError::from(err)
    })?;

    match action {
        WebhookAction::Complete(checkout) => {
            let applied = OrderRepo::apply_completed_checkout(&state.pool, &checkout).await?;
            tracing::info!(
                event_id = %event.id,
                session_id = %checkout.session_id,
                user_id = checkout.user_id,
                purchase_kind = checkout.target.kind(),
                target_id = checkout.target.target_id(),
                purchase_created = applied.purchase_created,
                order_completed = applied.order_completed,
                "Checkout completed",
            );
        }
        WebhookAction::AwaitPayment { session_id } => {
            tracing::info!(event_id = %event.id, %session_id, "Checkout awaiting payment");
        }
        WebhookAction::Expire { session_id } => {
            let order =
                OrderRepo::close_pending(&state.pool, &session_id, ORDER_STATUS_EXPIRED).await?;
            tracing::info!(
                event_id = %event.id,
                %session_id,
                updated = order.is_some(),
                "Checkout expired",
            );
        }
        WebhookAction::Fail { session_id } => {
            let order =
                OrderRepo::close_pending(&state.pool, &session_id, ORDER_STATUS_FAILED).await?;
            tracing::info!(
                event_id = %event.id,
                %session_id,
                updated = order.is_some(),
                "Checkout payment failed",
            );
        }
        WebhookAction::Ignore => {
            tracing::debug!(
                event_id = %event.id,
                event_type = %event.event_type,
                "Ignored Stripe event",
            );
        }
    }

    Ok(Json(json!({ "received": true })))
}
