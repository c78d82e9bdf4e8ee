//! Route definitions for `/checkout`.

use axum::routing::post;
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// Routes mounted at `/checkout`.
///
/// ```text
/// POST /sport-path   -> checkout_sport_path
/// POST /challenge    -> checkout_challenge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sport-path", post(checkout::checkout_sport_path))
        .route("/challenge", post(checkout::checkout_challenge))
}
