//! Payment orders: the local record of each Stripe Checkout Session.

use iguana_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const ORDER_STATUS_PENDING: &str = "pending";
pub const ORDER_STATUS_COMPLETED: &str = "completed";
pub const ORDER_STATUS_EXPIRED: &str = "expired";
pub const ORDER_STATUS_FAILED: &str = "failed";

/// A row from the `payment_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentOrder {
    pub id: DbId,
    pub user_id: DbId,
    pub stripe_session_id: String,
    /// `"sport_path"` or `"challenge"`.
    pub purchase_kind: String,
    pub target_id: DbId,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a freshly created checkout session.
#[derive(Debug, Clone)]
pub struct CreatePaymentOrder {
    pub user_id: DbId,
    pub stripe_session_id: String,
    pub purchase_kind: String,
    pub target_id: DbId,
    pub amount: i64,
    pub currency: String,
}
