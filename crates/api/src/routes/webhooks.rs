//! Route definitions for inbound webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::stripe_webhook;
use crate::state::AppState;

/// Routes mounted at `/webhooks`. Authenticated by signature, not by JWT.
///
/// ```text
/// POST /stripe   -> stripe_webhook::receive
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stripe", post(stripe_webhook::receive))
}
