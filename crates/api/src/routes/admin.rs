//! Route definitions for `/admin`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET  /redemption-codes                   -> list_codes
/// POST /redemption-codes                   -> create_code
/// POST /redemption-codes/{id}/deactivate   -> deactivate_code
/// PUT  /users/{id}/role                    -> update_user_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/redemption-codes",
            get(admin::list_codes).post(admin::create_code),
        )
        .route(
            "/redemption-codes/{id}/deactivate",
            post(admin::deactivate_code),
        )
        .route("/users/{id}/role", put(admin::update_user_role))
}
