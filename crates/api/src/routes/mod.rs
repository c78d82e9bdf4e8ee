pub mod admin;
pub mod auth;
pub mod challenges;
pub mod checkout;
pub mod health;
pub mod sport_paths;
pub mod user;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/me                                      current profile
/// /auth/me/sports                               replace declared sports (PUT)
///
/// /sport-paths                                  catalog with access flags
/// /sport-paths/purchases                        caller's purchases
/// /sport-paths/redeem                           redeem a code (POST)
/// /sport-paths/{key_name}/levels                levels with per-level access
///
/// /challenges                                   list
/// /challenges/{id}                              get
/// /challenges/{id}/join                         join (POST)
/// /challenges/{id}/days                         caller's days with lock flags
/// /challenges/{id}/days/{day_number}            set day status (PUT)
///
/// /checkout/sport-path                          open checkout session (POST)
/// /checkout/challenge                           open checkout session (POST)
///
/// /webhooks/stripe                              Stripe events (signed, public)
///
/// /user/preferences/{key}                       get, put, delete
///
/// /admin/redemption-codes                       list, create (admin only)
/// /admin/redemption-codes/{id}/deactivate       deactivate (POST)
/// /admin/users/{id}/role                        change role (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/sport-paths", sport_paths::router())
        .nest("/challenges", challenges::router())
        .nest("/checkout", checkout::router())
        .nest("/webhooks", webhooks::router())
        .nest("/user", user::router())
        .nest("/admin", admin::router())
}
