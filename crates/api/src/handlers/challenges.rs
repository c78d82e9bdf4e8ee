//! Handlers for challenges and the caller's challenge days.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use iguana_core::challenge_days::{
    current_day, is_day_locked, progress, ChallengeProgress, DaySnapshot, DayStatus,
};
use iguana_core::error::CoreError;
use iguana_core::roles::UserRole;
use iguana_core::types::{CalendarDate, DbId};
use iguana_db::models::challenge::{Challenge, ChallengeDay, ChallengeParticipant};
use iguana_db::models::user::User;
use iguana_db::repositories::{ChallengeRepo, PurchaseRepo};
use iguana_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::load_active_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response / request types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub has_access: bool,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    #[serde(flatten)]
    pub day: ChallengeDay,
    pub is_locked: bool,
}

/// The caller's run through one challenge.
#[derive(Debug, Serialize)]
pub struct ChallengeDaysView {
    pub challenge_id: DbId,
    pub started_on: CalendarDate,
    /// Lowest pending day that is open right now.
    pub current_day: Option<i32>,
    pub progress: ChallengeProgress,
    pub days: Vec<DayView>,
}

/// Request body for `PUT /challenges/{id}/days/{day_number}`.
#[derive(Debug, Deserialize)]
pub struct UpdateDayRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Premium roles see every challenge; others need a purchase for premium ones.
fn has_access(role: UserRole, challenge: &Challenge, purchased: &HashSet<DbId>) -> bool {
    role.is_premium() || !challenge.is_premium || purchased.contains(&challenge.id)
}

async fn purchased_challenge_ids(pool: &DbPool, user_id: DbId) -> AppResult<HashSet<DbId>> {
    Ok(PurchaseRepo::list_challenge_purchases(pool, user_id)
        .await?
        .into_iter()
        .map(|p| p.challenge_id)
        .collect())
}

async fn find_challenge(pool: &DbPool, id: DbId) -> AppResult<Challenge> {
    ChallengeRepo::find_published_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id,
        }))
}

async fn find_participation(
    pool: &DbPool,
    challenge_id: DbId,
    user: &User,
) -> AppResult<ChallengeParticipant> {
    ChallengeRepo::find_participant(pool, challenge_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Challenge {challenge_id} has not been joined")))
}

fn snapshots(days: &[ChallengeDay]) -> AppResult<Vec<DaySnapshot>> {
    days.iter()
        .map(|d| d.snapshot().map_err(AppError::from))
        .collect()
}

/// Days are scheduled and unlocked by UTC calendar date.
fn today() -> CalendarDate {
    Utc::now().date_naive()
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

/// GET /api/v1/challenges
pub async fn list_challenges(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ChallengeView>>>> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    let role = user.parsed_role()?;
    let purchased = purchased_challenge_ids(&state.pool, user.id).await?;

    let data = ChallengeRepo::list_published(&state.pool)
        .await?
        .into_iter()
        .map(|challenge| ChallengeView {
            has_access: has_access(role, &challenge, &purchased),
            challenge,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/challenges/{id}
pub async fn get_challenge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChallengeView>>> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    let challenge = find_challenge(&state.pool, id).await?;
    let purchased = purchased_challenge_ids(&state.pool, user.id).await?;

    Ok(Json(DataResponse {
        data: ChallengeView {
            has_access: has_access(user.parsed_role()?, &challenge, &purchased),
            challenge,
        },
    }))
}

/// POST /api/v1/challenges/{id}/join
///
/// Start the challenge today: creates the participant row and one pending
/// day per `duration_days`.
pub async fn join_challenge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    let challenge = find_challenge(&state.pool, id).await?;
    let purchased = purchased_challenge_ids(&state.pool, user.id).await?;

    if !has_access(user.parsed_role()?, &challenge, &purchased) {
        return Err(AppError::Core(CoreError::Forbidden(
            "This challenge requires a purchase".into(),
        )));
    }
    if ChallengeRepo::find_participant(&state.pool, id, user.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Challenge already joined".into(),
        )));
    }

    let participant = ChallengeRepo::join(&state.pool, &challenge, user.id, today()).await?;

    tracing::info!(
        user_id = user.id,
        challenge_id = id,
        participant_id = participant.id,
        duration_days = challenge.duration_days,
        "Challenge joined",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: participant })))
}

// ---------------------------------------------------------------------------
// Days
// ---------------------------------------------------------------------------

/// GET /api/v1/challenges/{id}/days
///
/// Every day of the caller's run with its lock flag, the current day and
/// progress counters.
pub async fn list_days(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChallengeDaysView>>> {
    let user = load_active_user(&state.pool, auth.user_id).await?;
    let is_admin = user.parsed_role()?.is_admin();
    let participant = find_participation(&state.pool, id, &user).await?;

    let days = ChallengeRepo::list_days(&state.pool, participant.id).await?;
    let all = snapshots(&days)?;
    let today = today();

    let data = ChallengeDaysView {
        challenge_id: id,
        started_on: participant.started_on,
        current_day: current_day(&all, is_admin, today),
        progress: progress(&all),
        days: days
            .into_iter()
            .map(|day| DayView {
                is_locked: is_day_locked(day.day_number, &all, is_admin, today),
                day,
            })
            .collect(),
    };

    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/challenges/{id}/days/{day_number}
///
/// Mark a day `completed`, `rest` or back to `pending`. Locked days are
/// refused with 403.
pub async fn update_day(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, day_number)): Path<(DbId, i32)>,
    Json(input): Json<UpdateDayRequest>,
) -> AppResult<Json<DataResponse<DayView>>> {
    let status = DayStatus::from_str_value(&input.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let user = load_active_user(&state.pool, auth.user_id).await?;
    let is_admin = user.parsed_role()?.is_admin();
    let participant = find_participation(&state.pool, id, &user).await?;

    let days = ChallengeRepo::list_days(&state.pool, participant.id).await?;
    if !days.iter().any(|d| d.day_number == day_number) {
        return Err(AppError::NotFound(format!(
            "Day {day_number} is not part of challenge {id}"
        )));
    }

    let all = snapshots(&days)?;
    let today = today();
    if is_day_locked(day_number, &all, is_admin, today) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Day {day_number} is locked"
        ))));
    }

    // The day exists, so `None` means a concurrent change locked it again.
    let day = ChallengeRepo::update_day_status(
        &state.pool,
        participant.id,
        day_number,
        status,
        is_admin,
        today,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(format!("Day {day_number} is locked")))
    })?;

    tracing::info!(
        user_id = user.id,
        challenge_id = id,
        day_number,
        status = status.as_str(),
        "Challenge day updated",
    );

    // Updating a day never changes its own lock state.
    Ok(Json(DataResponse {
        data: DayView {
            day,
            is_locked: false,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(id: DbId, is_premium: bool) -> Challenge {
        Challenge {
            id,
            title: "Szpagat w 30 dni".into(),
            description: None,
            is_published: true,
            is_premium,
            duration_days: 30,
            price_usd: 1999,
            price_pln: 7900,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn free_challenges_are_open_to_everyone() {
        assert!(has_access(UserRole::Free, &challenge(1, false), &HashSet::new()));
    }

    #[test]
    fn premium_challenges_need_role_or_purchase() {
        let paid = challenge(2, true);
        assert!(!has_access(UserRole::Free, &paid, &HashSet::new()));
        assert!(has_access(UserRole::Free, &paid, &HashSet::from([2])));
        assert!(has_access(UserRole::Trainer, &paid, &HashSet::new()));
    }
}
