//! Repository for `redemption_codes` and code-based sport purchases.

use iguana_core::types::DbId;
use sqlx::PgPool;

use crate::models::purchase::{SportPurchase, PURCHASE_TYPE_REDEMPTION};
use crate::models::redemption_code::{CreateRedemptionCode, RedemptionCode};
use crate::repositories::purchase_repo::SPORT_PURCHASE_COLUMNS;

const COLUMNS: &str = "\
    id, code, sport_category_id, max_uses, uses_count, expires_at, is_active, \
    created_by, created_at, updated_at";

/// Result of [`RedemptionCodeRepo::redeem`].
#[derive(Debug, Clone)]
pub enum RedeemOutcome {
    Redeemed(SportPurchase),
    /// The code was deactivated, expired or used up concurrently.
    NoLongerRedeemable,
    /// The user already owns the code's category.
    AlreadyOwned,
}

pub struct RedemptionCodeRepo;

impl RedemptionCodeRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateRedemptionCode,
    ) -> Result<RedemptionCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO redemption_codes \
                (code, sport_category_id, max_uses, expires_at, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RedemptionCode>(&query)
            .bind(&input.code)
            .bind(input.sport_category_id)
            .bind(input.max_uses)
            .bind(input.expires_at)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<RedemptionCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM redemption_codes ORDER BY created_at DESC");
        sqlx::query_as::<_, RedemptionCode>(&query)
            .fetch_all(pool)
            .await
    }

    /// Look up a code. `code` must already be normalized.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<RedemptionCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM redemption_codes WHERE code = $1");
        sqlx::query_as::<_, RedemptionCode>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RedemptionCode>, sqlx::Error> {
        let query = format!(
            "UPDATE redemption_codes SET is_active = false WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RedemptionCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Consume one use of `code` and grant its category to `user_id`.
    ///
    /// The usage counter is only incremented when the purchase row is
    /// actually inserted; both happen in one transaction.
    pub async fn redeem(
        pool: &PgPool,
        code: &RedemptionCode,
        user_id: DbId,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let consumed = sqlx::query(
            "UPDATE redemption_codes SET uses_count = uses_count + 1 \
             WHERE id = $1 \
               AND is_active = true \
               AND (expires_at IS NULL OR expires_at > NOW()) \
               AND (max_uses IS NULL OR uses_count < max_uses)",
        )
        .bind(code.id)
        .execute(&mut *tx)
        .await?;

        if consumed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(RedeemOutcome::NoLongerRedeemable);
        }

        let insert = format!(
            "INSERT INTO sport_purchases \
                (user_id, sport_category_id, purchase_type, redemption_code_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, sport_category_id) DO NOTHING \
             RETURNING {SPORT_PURCHASE_COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, SportPurchase>(&insert)
            .bind(user_id)
            .bind(code.sport_category_id)
            .bind(PURCHASE_TYPE_REDEMPTION)
            .bind(code.id)
            .fetch_optional(&mut *tx)
            .await?;

        match purchase {
            Some(purchase) => {
                tx.commit().await?;
                Ok(RedeemOutcome::Redeemed(purchase))
            }
            None => {
                tx.rollback().await?;
                Ok(RedeemOutcome::AlreadyOwned)
            }
        }
    }
}
