//! Admin handlers: redemption code management and role assignment.
//!
//! All endpoints require the admin role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use iguana_core::error::CoreError;
use iguana_core::redemption::{generate_code, normalize_code, validate_code_format};
use iguana_core::roles::UserRole;
use iguana_core::types::{DbId, Timestamp};
use iguana_db::models::redemption_code::CreateRedemptionCode;
use iguana_db::repositories::{RedemptionCodeRepo, SportRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/redemption-codes`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCodeRequest {
    /// Omit to generate a random code.
    pub code: Option<String>,
    #[validate(range(min = 1))]
    pub sport_category_id: DbId,
    /// `None` means unlimited.
    #[validate(range(min = 1))]
    pub max_uses: Option<i32>,
    pub expires_at: Option<Timestamp>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

// ---------------------------------------------------------------------------
// Redemption codes
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/redemption-codes
pub async fn list_codes(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let codes = RedemptionCodeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// POST /api/v1/admin/redemption-codes
///
/// Create a code for one sport category. A duplicate code is rejected with 409.
pub async fn create_code(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCodeRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let code = match input.code.as_deref() {
        Some(raw) => normalize_code(raw),
        None => generate_code(),
    };
    validate_code_format(&code)?;

    if input.expires_at.is_some_and(|at| at <= Utc::now()) {
        return Err(AppError::Core(CoreError::Validation(
            "expires_at must be in the future".into(),
        )));
    }

    SportRepo::find_category_by_id(&state.pool, input.sport_category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SportCategory",
            id: input.sport_category_id,
        }))?;

    let created = RedemptionCodeRepo::create(
        &state.pool,
        &CreateRedemptionCode {
            code,
            sport_category_id: input.sport_category_id,
            max_uses: input.max_uses,
            expires_at: input.expires_at,
            created_by: admin.user_id,
        },
    )
    .await?;

    tracing::info!(
        redemption_code_id = created.id,
        sport_category_id = created.sport_category_id,
        max_uses = ?created.max_uses,
        user_id = admin.user_id,
        "Redemption code created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/v1/admin/redemption-codes/{id}/deactivate
pub async fn deactivate_code(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let code = RedemptionCodeRepo::deactivate(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "RedemptionCode",
            id,
        }))?;

    tracing::info!(redemption_code_id = id, user_id = admin.user_id, "Redemption code deactivated");

    Ok(Json(DataResponse { data: code }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// PUT /api/v1/admin/users/{id}/role
///
/// Admins cannot remove their own admin role.
pub async fn update_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id && !input.role.is_admin() {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot remove their own admin role".into(),
        )));
    }

    let user = UserRepo::update_role(&state.pool, id, input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        target_user_id = id,
        role = %input.role,
        user_id = admin.user_id,
        "User role changed",
    );

    Ok(Json(DataResponse {
        data: user.profile()?,
    }))
}
