//! Redemption codes granting sport-path access without payment.

use iguana_core::redemption::CodeUsage;
use iguana_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `redemption_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RedemptionCode {
    pub id: DbId,
    pub code: String,
    pub sport_category_id: DbId,
    /// `None` means unlimited.
    pub max_uses: Option<i32>,
    pub uses_count: i32,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RedemptionCode {
    pub fn usage(&self) -> CodeUsage {
        CodeUsage {
            is_active: self.is_active,
            max_uses: self.max_uses,
            uses_count: self.uses_count,
            expires_at: self.expires_at,
        }
    }
}

/// DTO for inserting a code. `code` must already be normalized.
#[derive(Debug, Clone)]
pub struct CreateRedemptionCode {
    pub code: String,
    pub sport_category_id: DbId,
    pub max_uses: Option<i32>,
    pub expires_at: Option<Timestamp>,
    pub created_by: DbId,
}
