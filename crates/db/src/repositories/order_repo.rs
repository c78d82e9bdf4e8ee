//! Repository for `payment_orders`, plus applying completed checkouts.

use iguana_core::checkout::{CompletedCheckout, PurchaseTarget};
use iguana_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{
    CreatePaymentOrder, PaymentOrder, ORDER_STATUS_COMPLETED, ORDER_STATUS_PENDING,
};
use crate::models::purchase::PURCHASE_TYPE_PAYMENT;

const COLUMNS: &str = "\
    id, user_id, stripe_session_id, purchase_kind, target_id, amount, currency, \
    status, completed_at, created_at, updated_at";

/// What [`OrderRepo::apply_completed_checkout`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutApplied {
    /// `false` when the session had already been turned into a purchase
    /// (webhook redelivery) or the user already owned the target.
    pub purchase_created: bool,
    /// `false` when no pending order matched the session.
    pub order_completed: bool,
}

pub struct OrderRepo;

impl OrderRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePaymentOrder,
    ) -> Result<PaymentOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_orders \
                (user_id, stripe_session_id, purchase_kind, target_id, amount, currency) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentOrder>(&query)
            .bind(input.user_id)
            .bind(&input.stripe_session_id)
            .bind(&input.purchase_kind)
            .bind(input.target_id)
            .bind(input.amount)
            .bind(&input.currency)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_session(
        pool: &PgPool,
        stripe_session_id: &str,
    ) -> Result<Option<PaymentOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_orders WHERE stripe_session_id = $1");
        sqlx::query_as::<_, PaymentOrder>(&query)
            .bind(stripe_session_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PaymentOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_orders WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PaymentOrder>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Move a still-pending order to `status` (`expired` or `failed`).
    ///
    /// Completed orders are never downgraded; returns `None` when nothing matched.
    pub async fn close_pending(
        pool: &PgPool,
        stripe_session_id: &str,
        status: &str,
    ) -> Result<Option<PaymentOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_orders SET status = $2 \
             WHERE stripe_session_id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentOrder>(&query)
            .bind(stripe_session_id)
            .bind(status)
            .bind(ORDER_STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Insert the purchase row for a paid session and complete its order,
    /// atomically. Safe to call repeatedly for the same session.
    pub async fn apply_completed_checkout(
        pool: &PgPool,
        checkout: &CompletedCheckout,
    ) -> Result<CheckoutApplied, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted = match checkout.target {
            PurchaseTarget::SportPath { sport_category_id } => {
                sqlx::query(
                    "INSERT INTO sport_purchases \
                        (user_id, sport_category_id, purchase_type, stripe_session_id) \
                     VALUES ($1, $2, $3, $4) \
                     ON CONFLICT DO NOTHING",
                )
                .bind(checkout.user_id)
                .bind(sport_category_id)
                .bind(PURCHASE_TYPE_PAYMENT)
                .bind(&checkout.session_id)
                .execute(&mut *tx)
                .await?
            }
            PurchaseTarget::Challenge { challenge_id } => {
                sqlx::query(
                    "INSERT INTO challenge_purchases (user_id, challenge_id, stripe_session_id) \
                     VALUES ($1, $2, $3) \
                     ON CONFLICT DO NOTHING",
                )
                .bind(checkout.user_id)
                .bind(challenge_id)
                .bind(&checkout.session_id)
                .execute(&mut *tx)
                .await?
            }
        };

        let completed = sqlx::query(
            "UPDATE payment_orders SET status = $2, completed_at = NOW() \
             WHERE stripe_session_id = $1 AND status <> $2",
        )
        .bind(&checkout.session_id)
        .bind(ORDER_STATUS_COMPLETED)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CheckoutApplied {
            purchase_created: inserted.rows_affected() > 0,
            order_completed: completed.rows_affected() > 0,
        })
    }
}
