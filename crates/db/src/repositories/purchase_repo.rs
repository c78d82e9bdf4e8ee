//! Read access to `sport_purchases` and `challenge_purchases`.
//!
//! Rows are inserted by [`OrderRepo::apply_completed_checkout`] and
//! [`RedemptionCodeRepo::redeem`] only.
//!
//! [`OrderRepo::apply_completed_checkout`]: crate::repositories::OrderRepo::apply_completed_checkout
//! [`RedemptionCodeRepo::redeem`]: crate::repositories::RedemptionCodeRepo::redeem

use iguana_core::types::DbId;
use sqlx::PgPool;

use crate::models::purchase::{ChallengePurchase, SportPurchase};

pub(crate) const SPORT_PURCHASE_COLUMNS: &str = "\
    id, user_id, sport_category_id, purchase_type, stripe_session_id, \
    redemption_code_id, purchased_at";

const CHALLENGE_PURCHASE_COLUMNS: &str =
    "id, user_id, challenge_id, stripe_session_id, purchased_at";

pub struct PurchaseRepo;

impl PurchaseRepo {
    pub async fn list_sport_purchases(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SportPurchase>, sqlx::Error> {
        let query = format!(
            "SELECT {SPORT_PURCHASE_COLUMNS} FROM sport_purchases \
             WHERE user_id = $1 ORDER BY purchased_at DESC"
        );
        sqlx::query_as::<_, SportPurchase>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Category ids the user owns, for the entitlement resolver.
    pub async fn purchased_category_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT sport_category_id FROM sport_purchases WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn has_sport_purchase(
        pool: &PgPool,
        user_id: DbId,
        sport_category_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sport_purchases \
             WHERE user_id = $1 AND sport_category_id = $2)",
        )
        .bind(user_id)
        .bind(sport_category_id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_challenge_purchases(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ChallengePurchase>, sqlx::Error> {
        let query = format!(
            "SELECT {CHALLENGE_PURCHASE_COLUMNS} FROM challenge_purchases \
             WHERE user_id = $1 ORDER BY purchased_at DESC"
        );
        sqlx::query_as::<_, ChallengePurchase>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn has_challenge_purchase(
        pool: &PgPool,
        user_id: DbId,
        challenge_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM challenge_purchases \
             WHERE user_id = $1 AND challenge_id = $2)",
        )
        .bind(user_id)
        .bind(challenge_id)
        .fetch_one(pool)
        .await
    }
}
