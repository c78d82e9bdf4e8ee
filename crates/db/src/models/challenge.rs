//! Challenges, participants and per-participant day rows.

use iguana_core::challenge_days::{DayStatus, DaySnapshot};
use iguana_core::error::CoreError;
use iguana_core::pricing::DualPrice;
use iguana_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `challenges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Challenge {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub is_premium: bool,
    pub duration_days: i32,
    pub price_usd: i64,
    pub price_pln: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Challenge {
    pub fn price(&self) -> DualPrice {
        DualPrice::new(self.price_usd, self.price_pln)
    }
}

/// DTO for creating a challenge.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChallenge {
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub is_premium: bool,
    pub duration_days: i32,
    pub price_usd: i64,
    pub price_pln: i64,
}

/// A row from the `challenge_participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeParticipant {
    pub id: DbId,
    pub challenge_id: DbId,
    pub user_id: DbId,
    pub started_on: CalendarDate,
    pub created_at: Timestamp,
}

/// A row from the `challenge_days` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeDay {
    pub id: DbId,
    pub participant_id: DbId,
    pub day_number: i32,
    pub status: String,
    pub calendar_date: Option<CalendarDate>,
    pub completed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl ChallengeDay {
    pub fn snapshot(&self) -> Result<DaySnapshot, CoreError> {
        let status = DayStatus::from_str_value(&self.status).map_err(CoreError::Internal)?;
        Ok(DaySnapshot::new(self.day_number, status, self.calendar_date))
    }
}
