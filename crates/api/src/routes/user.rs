//! Route definitions for `/user` (the caller's own settings).

use axum::routing::get;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /preferences/{key}   -> get_preference
/// PUT    /preferences/{key}   -> put_preference
/// DELETE /preferences/{key}   -> delete_preference
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/preferences/{key}",
        get(preferences::get_preference)
            .put(preferences::put_preference)
            .delete(preferences::delete_preference),
    )
}
