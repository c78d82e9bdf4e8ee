//! Route definitions for the `/challenges` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::challenges;
use crate::state::AppState;

/// Routes mounted at `/challenges`.
///
/// ```text
/// GET  /                          -> list_challenges
/// GET  /{id}                      -> get_challenge
/// POST /{id}/join                 -> join_challenge
/// GET  /{id}/days                 -> list_days
/// PUT  /{id}/days/{day_number}    -> update_day
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(challenges::list_challenges))
        .route("/{id}", get(challenges::get_challenge))
        .route("/{id}/join", post(challenges::join_challenge))
        .route("/{id}/days", get(challenges::list_days))
        .route("/{id}/days/{day_number}", put(challenges::update_day))
}
