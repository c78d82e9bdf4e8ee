//! Handlers for the `/auth` resource (login, current profile).

use axum::extract::State;
use axum::Json;
use iguana_core::error::CoreError;
use iguana_db::models::user::UserProfile;
use iguana_db::repositories::{SportRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::load_active_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Request body for `PUT /auth/me/sports`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSportsRequest {
    #[validate(length(max = 20))]
    pub sports: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token and the profile.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    let profile = user.profile()?;
    let access_token = generate_access_token(user.id, profile.role.as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %profile.role, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: profile,
    }))
}

/// GET /api/v1/auth/me
///
/// The caller's profile, including role badge and declared sports.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: user.profile()?,
    }))
}

/// PUT /api/v1/auth/me/sports
///
/// Replace the caller's declared sports. Every entry must be the `key_name`
/// of a published sport category; duplicates are dropped.
pub async fn update_sports(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateSportsRequest>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    input.validate()?;

    let published = SportRepo::list_published_categories(&state.pool).await?;

    let mut sports: Vec<String> = Vec::with_capacity(input.sports.len());
    for raw in &input.sports {
        let key = raw.trim();
        if !published.iter().any(|c| c.key_name == key) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown sport '{key}'"
            ))));
        }
        if !sports.iter().any(|s| s == key) {
            sports.push(key.to_string());
        }
    }

    let user = UserRepo::update_sports(&state.pool, auth.user_id, &sports)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = user.id, sports = ?user.sports, "Declared sports updated");

    Ok(Json(DataResponse {
        data: user.profile()?,
    }))
}
