//! Repository for `challenges`, `challenge_participants` and `challenge_days`.

use iguana_core::challenge_days::DayStatus;
use iguana_core::types::{CalendarDate, DbId};
use sqlx::PgPool;

use crate::models::challenge::{Challenge, ChallengeDay, ChallengeParticipant, CreateChallenge};

const CHALLENGE_COLUMNS: &str = "\
    id, title, description, is_published, is_premium, duration_days, \
    price_usd, price_pln, created_at, updated_at";

const PARTICIPANT_COLUMNS: &str = "id, challenge_id, user_id, started_on, created_at";

const DAY_COLUMNS: &str = "\
    id, participant_id, day_number, status, calendar_date, completed_at, updated_at";

pub struct ChallengeRepo;

impl ChallengeRepo {
    // -----------------------------------------------------------------------
    // Challenges
    // -----------------------------------------------------------------------

    pub async fn create(pool: &PgPool, input: &CreateChallenge) -> Result<Challenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenges \
                (title, description, is_published, is_premium, duration_days, price_usd, price_pln) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CHALLENGE_COLUMNS}"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_published)
            .bind(input.is_premium)
            .bind(input.duration_days)
            .bind(input.price_usd)
            .bind(input.price_pln)
            .fetch_one(pool)
            .await
    }

    pub async fn list_published(pool: &PgPool) -> Result<Vec<Challenge>, sqlx::Error> {
        let query = format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges \
             WHERE is_published = true ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Challenge>(&query).fetch_all(pool).await
    }

    pub async fn find_published_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE id = $1 AND is_published = true"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Participation
    // -----------------------------------------------------------------------

    /// Start a challenge for a user: one participant row plus
    /// `duration_days` pending days scheduled from `started_on`.
    pub async fn join(
        pool: &PgPool,
        challenge: &Challenge,
        user_id: DbId,
        started_on: CalendarDate,
    ) -> Result<ChallengeParticipant, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_participant = format!(
            "INSERT INTO challenge_participants (challenge_id, user_id, started_on) \
             VALUES ($1, $2, $3) \
             RETURNING {PARTICIPANT_COLUMNS}"
        );
        let participant = sqlx::query_as::<_, ChallengeParticipant>(&insert_participant)
            .bind(challenge.id)
            .bind(user_id)
            .bind(started_on)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO challenge_days (participant_id, day_number, calendar_date) \
             SELECT $1, n, $2::DATE + (n - 1) \
             FROM generate_series(1, $3) AS n",
        )
        .bind(participant.id)
        .bind(started_on)
        .bind(challenge.duration_days)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(participant)
    }

    pub async fn find_participant(
        pool: &PgPool,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChallengeParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM challenge_participants \
             WHERE challenge_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Days
    // -----------------------------------------------------------------------

    pub async fn list_days(
        pool: &PgPool,
        participant_id: DbId,
    ) -> Result<Vec<ChallengeDay>, sqlx::Error> {
        let query = format!(
            "SELECT {DAY_COLUMNS} FROM challenge_days \
             WHERE participant_id = $1 ORDER BY day_number"
        );
        sqlx::query_as::<_, ChallengeDay>(&query)
            .bind(participant_id)
            .fetch_all(pool)
            .await
    }

    /// Set a day's status if the day is unlocked at the moment of the write.
    ///
    /// The lock rule is re-checked inside the UPDATE: unless `is_admin`, a day
    /// after the first needs its previous day `completed` or `rest` and a
    /// calendar date no later than `today`. Returns `None` when the day does
    /// not exist or is locked. `completed_at` tracks the last move out of
    /// `pending`.
    pub async fn update_day_status(
        pool: &PgPool,
        participant_id: DbId,
        day_number: i32,
        status: DayStatus,
        is_admin: bool,
        today: CalendarDate,
    ) -> Result<Option<ChallengeDay>, sqlx::Error> {
        let query = format!(
            "UPDATE challenge_days SET \
                 status = $3, \
                 completed_at = CASE WHEN $3 = 'pending' THEN NULL ELSE NOW() END \
             WHERE participant_id = $1 AND day_number = $2 \
               AND ($4 OR day_number = 1 OR ( \
                   (calendar_date IS NULL OR calendar_date <= $5) \
                   AND EXISTS ( \
                       SELECT 1 FROM challenge_days prev \
                       WHERE prev.participant_id = $1 \
                         AND prev.day_number = $2 - 1 \
                         AND prev.status IN ('completed', 'rest') \
                       FOR SHARE))) \
             RETURNING {DAY_COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeDay>(&query)
            .bind(participant_id)
            .bind(day_number)
            .bind(status.as_str())
            .bind(is_admin)
            .bind(today)
            .fetch_optional(pool)
            .await
    }
}
