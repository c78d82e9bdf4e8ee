//! Route definitions for the `/sport-paths` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sport_paths;
use crate::state::AppState;

/// Routes mounted at `/sport-paths`.
///
/// ```text
/// GET  /                     -> list_sport_paths
/// GET  /purchases            -> list_purchases
/// POST /redeem               -> redeem_code
/// GET  /{key_name}/levels    -> list_levels
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sport_paths::list_sport_paths))
        .route("/purchases", get(sport_paths::list_purchases))
        .route("/redeem", post(sport_paths::redeem_code))
        .route("/{key_name}/levels", get(sport_paths::list_levels))
}
