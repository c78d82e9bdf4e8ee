//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `iguana_db`, run the pure access
//! rules from `iguana_core`, and map errors via [`AppError`].

pub mod admin;
pub mod auth;
pub mod challenges;
pub mod checkout;
pub mod preferences;
pub mod sport_paths;
pub mod stripe_webhook;

use iguana_core::error::CoreError;
use iguana_core::sport_access::EntitlementContext;
use iguana_core::types::DbId;
use iguana_db::models::user::User;
use iguana_db::repositories::{PurchaseRepo, UserRepo};
use iguana_db::DbPool;

use crate::error::{AppError, AppResult};

/// Load the caller's row. Tokens outlive role changes, so access decisions
/// use the stored role rather than the token claim.
pub(crate) async fn load_active_user(pool: &DbPool, user_id: DbId) -> AppResult<User> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    Ok(user)
}

/// Snapshot of what the sport-path resolver needs for `user`.
pub(crate) async fn entitlement_context(
    pool: &DbPool,
    user: &User,
) -> AppResult<EntitlementContext> {
    let purchased = PurchaseRepo::purchased_category_ids(pool, user.id).await?;
    Ok(EntitlementContext::new(
        user.parsed_role()?,
        user.sports.clone(),
        purchased,
    ))
}
