//! Handlers for the sport-path catalog, purchases and code redemption.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use iguana_core::error::CoreError;
use iguana_core::redemption::{check_redeemable, normalize_code, validate_code_format};
use iguana_core::sport_access::{CategoryAccess, LevelAccess, SportAccessResolver};
use iguana_core::types::DbId;
use iguana_db::models::sport::{SportCategory, SportLevel};
use iguana_db::repositories::{PurchaseRepo, RedeemOutcome, RedemptionCodeRepo, SportRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{entitlement_context, load_active_user};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response / request types
// ---------------------------------------------------------------------------

/// A published category with the caller's access to it.
#[derive(Debug, Serialize)]
pub struct SportPathView {
    #[serde(flatten)]
    pub category: SportCategory,
    pub access: CategoryAccess,
}

#[derive(Debug, Serialize)]
pub struct LevelView {
    #[serde(flatten)]
    pub level: SportLevel,
    pub is_demo: bool,
    pub access: LevelAccess,
}

#[derive(Debug, Serialize)]
pub struct SportPathLevels {
    pub sport_path: SportPathView,
    pub levels: Vec<LevelView>,
}

/// Request body for `POST /sport-paths/redeem`.
#[derive(Debug, Deserialize, Validate)]
pub struct RedeemRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/sport-paths
///
/// Published sport categories with full/demo/purchased flags and both prices.
pub async fn list_sport_paths(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SportPathView>>>> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    let context = entitlement_context(&state.pool, &user).await?;

    let categories = SportRepo::list_published_categories(&state.pool).await?;
    let snapshots: Vec<_> = categories.iter().map(SportCategory::snapshot).collect();
    let resolver = SportAccessResolver::new(&context, &snapshots);

    let data = categories
        .into_iter()
        .zip(resolver.classify_all())
        .map(|(category, (_, access))| SportPathView { category, access })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/sport-paths/{key_name}/levels
///
/// Published levels of one category, each marked `full`, `demo` or `none`
/// for the caller.
pub async fn list_levels(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(key_name): Path<String>,
) -> AppResult<Json<DataResponse<SportPathLevels>>> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    let context = entitlement_context(&state.pool, &user).await?;

    let category = SportRepo::find_published_category_by_key(&state.pool, &key_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sport path '{key_name}' not found")))?;
    let snapshots = vec![category.snapshot()];
    let resolver = SportAccessResolver::new(&context, &snapshots);
    let snapshot = &snapshots[0];

    let levels = SportRepo::list_published_levels(&state.pool, category.id)
        .await?
        .into_iter()
        .map(|level| LevelView {
            is_demo: snapshot.is_demo_level(level.level_number),
            access: resolver.level_access(snapshot, level.level_number),
            level,
        })
        .collect();

    let access = resolver.classify(snapshot);
    Ok(Json(DataResponse {
        data: SportPathLevels {
            sport_path: SportPathView { category, access },
            levels,
        },
    }))
}

/// GET /api/v1/sport-paths/purchases
///
/// The caller's sport-path purchases, newest first.
pub async fn list_purchases(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let purchases = PurchaseRepo::list_sport_purchases(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: purchases }))
}

// ---------------------------------------------------------------------------
// Redemption
// ---------------------------------------------------------------------------

/// POST /api/v1/sport-paths/redeem
///
/// Grant a sport path with a redemption code.
///
/// - unknown code: 404
/// - inactive, expired or used up: 400
/// - category already owned: 409
pub async fn redeem_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RedeemRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let user = load_active_user(&state.pool, auth.user_id).await?;

    let code = normalize_code(&input.code);
    validate_code_format(&code)?;

    let stored = RedemptionCodeRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("Redemption code not found".into()))?;

    check_redeemable(&stored.usage(), Utc::now()).map_err(CoreError::from)?;

    if PurchaseRepo::has_sport_purchase(&state.pool, user.id, stored.sport_category_id).await? {
        return Err(already_owned(stored.sport_category_id));
    }

    match RedemptionCodeRepo::redeem(&state.pool, &stored, user.id).await? {
        RedeemOutcome::Redeemed(purchase) => {
            tracing::info!(
                user_id = user.id,
                sport_category_id = purchase.sport_category_id,
                redemption_code_id = stored.id,
                "Sport path redeemed",
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: purchase })))
        }
        RedeemOutcome::NoLongerRedeemable => Err(AppError::Core(CoreError::Validation(
            "Redemption code is no longer redeemable".into(),
        ))),
        RedeemOutcome::AlreadyOwned => Err(already_owned(stored.sport_category_id)),
    }
}

fn already_owned(sport_category_id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Sport path {sport_category_id} is already unlocked for this account"
    )))
}
