//! Challenge day locking.
//!
//! Days unlock sequentially: a day opens once the previous day is done
//! (completed or taken as a rest day) and its scheduled date has arrived.
//! All functions here are pure; the caller supplies the day list and
//! today's date.

use serde::{Deserialize, Serialize};

use crate::types::CalendarDate;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_REST: &str = "rest";

/// All valid day status strings.
pub const VALID_DAY_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_COMPLETED, STATUS_REST];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Progress state of a single challenge day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Pending,
    Completed,
    Rest,
}

impl DayStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_REST => Ok(Self::Rest),
            _ => Err(format!(
                "Invalid day status '{s}'. Must be one of: {}",
                VALID_DAY_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Completed => STATUS_COMPLETED,
            Self::Rest => STATUS_REST,
        }
    }

    /// A rest day unlocks the next day exactly like a completed one.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completed | Self::Rest)
    }
}

/// The fields of a challenge day that locking depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySnapshot {
    pub day_number: i32,
    pub status: DayStatus,
    pub calendar_date: Option<CalendarDate>,
}

impl DaySnapshot {
    pub fn new(day_number: i32, status: DayStatus, calendar_date: Option<CalendarDate>) -> Self {
        Self {
            day_number,
            status,
            calendar_date,
        }
    }
}

/// Lock flag for one day, as returned by [`day_lock_states`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayLockState {
    pub day_number: i32,
    pub is_locked: bool,
}

/// Counts of days by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChallengeProgress {
    pub completed: usize,
    pub rest: usize,
    pub pending: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Decide whether `day_number` is locked.
///
/// Admins are never locked out and day 1 is always open. Any other day is
/// locked when the previous day is missing from `all_days`, when the
/// previous day is still pending, or when the day itself is scheduled after
/// `today`. A day without a calendar date is only gated by the previous day.
pub fn is_day_locked(
    day_number: i32,
    all_days: &[DaySnapshot],
    is_admin: bool,
    today: CalendarDate,
) -> bool {
    if is_admin || day_number == 1 {
        return false;
    }

    let Some(previous) = all_days.iter().find(|d| d.day_number == day_number - 1) else {
        return true;
    };

    if !previous.status.is_done() {
        return true;
    }

    // Scheduled in the future.
    all_days
        .iter()
        .find(|d| d.day_number == day_number)
        .and_then(|d| d.calendar_date)
        .is_some_and(|date| date > today)
}

/// Lock state of every day in `all_days`, ordered by day number.
pub fn day_lock_states(
    all_days: &[DaySnapshot],
    is_admin: bool,
    today: CalendarDate,
) -> Vec<DayLockState> {
    let mut states: Vec<DayLockState> = all_days
        .iter()
        .map(|d| DayLockState {
            day_number: d.day_number,
            is_locked: is_day_locked(d.day_number, all_days, is_admin, today),
        })
        .collect();
    states.sort_by_key(|s| s.day_number);
    states
}

/// The lowest-numbered pending day that is currently unlocked.
pub fn current_day(all_days: &[DaySnapshot], is_admin: bool, today: CalendarDate) -> Option<i32> {
    all_days
        .iter()
        .filter(|d| d.status == DayStatus::Pending)
        .filter(|d| !is_day_locked(d.day_number, all_days, is_admin, today))
        .map(|d| d.day_number)
        .min()
}

pub fn progress(all_days: &[DaySnapshot]) -> ChallengeProgress {
    all_days
        .iter()
        .fold(ChallengeProgress::default(), |mut acc, day| {
            match day.status {
                DayStatus::Completed => acc.completed += 1,
                DayStatus::Rest => acc.rest += 1,
                DayStatus::Pending => acc.pending += 1,
            }
            acc.total += 1;
            acc
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
