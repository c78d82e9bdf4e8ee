//! Purchase rows granting access to sport paths and challenges.
//!
//! Purchase rows are created once and never updated or deleted.

use iguana_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// `purchase_type` for purchases paid through Stripe checkout.
pub const PURCHASE_TYPE_PAYMENT: &str = "payment";
/// `purchase_type` for purchases granted by a redemption code.
pub const PURCHASE_TYPE_REDEMPTION: &str = "redemption";

/// A row from the `sport_purchases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SportPurchase {
    pub id: DbId,
    pub user_id: DbId,
    pub sport_category_id: DbId,
    pub purchase_type: String,
    #[serde(skip_serializing)]
    pub stripe_session_id: Option<String>,
    #[serde(skip_serializing)]
    pub redemption_code_id: Option<DbId>,
    pub purchased_at: Timestamp,
}

/// A row from the `challenge_purchases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengePurchase {
    pub id: DbId,
    pub user_id: DbId,
    pub challenge_id: DbId,
    #[serde(skip_serializing)]
    pub stripe_session_id: Option<String>,
    pub purchased_at: Timestamp,
}
